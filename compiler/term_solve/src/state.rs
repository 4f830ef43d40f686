use crate::machine::{Solve, Step};
use crate::{Context, Entry, Language, SchemeOf};
use term_common::FreshVariableStream;
use term_core::{Name, Result, TypeError};
use term_print::PrettyString;

use tracing::{debug, trace};
use ustr::ustr;

/// Settings for one run of inference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Record every intermediate state of the solver and log it.
    pub trace: bool,
}

impl Options {
    pub fn normal() -> Self {
        Self { trace: false }
    }

    pub fn tracing() -> Self {
        Self { trace: true }
    }
}

/// The fresh-name supply together with the typing context.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceState<L: Language> {
    pub fresh: FreshVariableStream,
    pub context: Context<L>,
}

impl<L: Language> Default for InferenceState<L> {
    fn default() -> Self {
        Self::new(FreshVariableStream::new(), vec![])
    }
}

impl<L: Language> InferenceState<L> {
    pub fn new(fresh: FreshVariableStream, entries: impl IntoIterator<Item = Entry<L>>) -> Self {
        Self {
            fresh,
            context: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn push(mut self, entry: Entry<L>) -> Self {
        self.context.push(entry);
        self
    }

    /// Binds a term variable in the initial context.
    #[must_use]
    pub fn with_binding(self, name: &str, scheme: SchemeOf<L>) -> Self {
        self.push(Entry::Bind(ustr(name), scheme))
    }

    /// Draws a fresh name.
    #[must_use]
    pub fn fresh_var(self, prefix: &str) -> (Self, Name) {
        let (fresh, name) = self.fresh.next(prefix);
        (
            Self {
                fresh,
                context: self.context,
            },
            name,
        )
    }

    pub fn can_step(&self) -> bool {
        self.context.has_constraints()
    }

    /// Rewrites the first constraint once.
    pub fn step(self) -> Result<Self> {
        let InferenceState { fresh, context } = self;
        let mut prefix = context.into_entries();
        let Some(at) = prefix.iter().position(Entry::is_constraint) else {
            return Ok(InferenceState::new(fresh, prefix));
        };
        let mut rest = prefix.split_off(at);
        let suffix = rest.split_off(1);
        let Some(Entry::Constraint(constraint)) = rest.pop() else {
            return Err(TypeError::malformed("lost the constraint being solved"));
        };
        trace!("solving: {}", constraint.plain_string(&()));
        constraint.solve(Step {
            fresh,
            prefix,
            suffix,
        })
    }

    /// Steps until no constraint is left.
    pub fn unify(self) -> Result<Self> {
        let mut state = self;
        while state.can_step() {
            state = state.step()?;
        }
        Ok(state)
    }

    /// Like [`InferenceState::unify`], also returning every state passed
    /// through, the final one included.
    pub fn unify_traced(self) -> Result<(Self, Vec<Self>)> {
        let mut state = self;
        let mut states = vec![];
        while state.can_step() {
            state = state.step()?;
            states.push(state.clone());
        }
        Ok((state, states))
    }

    /// Runs the solver as configured by `options`.
    pub fn unify_with(self, options: &Options) -> Result<Self> {
        if !options.trace {
            return self.unify();
        }
        let (state, states) = self.unify_traced()?;
        for (i, s) in states.iter().enumerate() {
            debug!("step {}: {}", i, s.context.plain_string(&()));
        }
        Ok(state)
    }
}
