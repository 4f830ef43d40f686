//! The solving machine.
//!
//! Constraints live in the context next to the entries they talk about. A
//! step takes the first constraint, splits the context around it and
//! rewrites the constraint against the entry just below it: the constraint
//! floats past entries that do not concern it, turns into a definition when
//! it reaches the intro of its variable, and picks up the intros its other
//! side depends on on the way.

use crate::{intros, Entry, InferenceState, Language};
use term_core::{HasVariables, Name, Result, Substitute, TypeError, TypeExpr};
use term_common::FreshVariableStream;

/// A constraint the machine knows how to rewrite.
pub trait Solve<L: Language> {
    fn solve(self, step: Step<L>) -> Result<InferenceState<L>>;
}

/// The context split around the constraint being solved.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<L: Language> {
    pub fresh: FreshVariableStream,
    /// Entries before the constraint, oldest first.
    pub prefix: Vec<Entry<L>>,
    /// Everything after the constraint.
    pub suffix: Vec<Entry<L>>,
}

impl<L: Language> Step<L> {
    /// Takes the entry right below the constraint.
    pub fn pop(&mut self) -> Result<Entry<L>> {
        self.prefix
            .pop()
            .ok_or_else(|| TypeError::malformed("a constraint mentions a variable that was never introduced"))
    }

    /// Puts the context back together with `emitted` in place of the
    /// constraint.
    pub fn resume(self, emitted: impl IntoIterator<Item = Entry<L>>) -> InferenceState<L> {
        let Step {
            fresh,
            mut prefix,
            suffix,
        } = self;
        prefix.extend(emitted);
        prefix.extend(suffix);
        InferenceState::new(fresh, prefix)
    }

    /// Moves the constraint below `top`.
    pub fn float(self, constraint: L::Constraint, top: Entry<L>) -> InferenceState<L> {
        self.resume([Entry::Constraint(constraint), top])
    }
}

/// `left == right`.
///
/// `deps` are intros lifted out of the context because the equation depends
/// on them; they go back in, in order, when the equation is solved.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeEq<L: Language> {
    pub deps: Vec<(Name, L::Kind)>,
    pub left: L::Type,
    pub right: L::Type,
}

impl<L: Language> TypeEq<L> {
    pub fn new(left: L::Type, right: L::Type) -> Self {
        Self {
            deps: vec![],
            left,
            right,
        }
    }
}

/// A variable equated with a type that is not a variable.
#[derive(Clone, Debug, PartialEq)]
pub struct FlexRigid<L: Language> {
    pub deps: Vec<(Name, L::Kind)>,
    pub name: Name,
    /// `name` as a type.
    pub flex: L::Type,
    pub rigid: L::Type,
}

impl<L: Language> From<FlexRigid<L>> for TypeEq<L> {
    fn from(eq: FlexRigid<L>) -> Self {
        TypeEq {
            deps: eq.deps,
            left: eq.flex,
            right: eq.rigid,
        }
    }
}

impl<L: Language> Solve<L> for TypeEq<L> {
    fn solve(self, step: Step<L>) -> Result<InferenceState<L>> {
        solve_type_eq(step, self)
    }
}

pub fn solve_type_eq<L: Language>(mut step: Step<L>, eq: TypeEq<L>) -> Result<InferenceState<L>> {
    let TypeEq { deps, left, right } = eq;
    match (left.as_var(), right.as_var()) {
        (Some(name), None) => L::flex_rigid(
            step,
            FlexRigid {
                deps,
                name,
                flex: left,
                rigid: right,
            },
        ),
        (None, Some(name)) => L::flex_rigid(
            step,
            FlexRigid {
                deps,
                name,
                flex: right,
                rigid: left,
            },
        ),
        (Some(a), Some(b)) if a == b => Ok(step.resume(intros(deps))),
        (Some(a), Some(b)) => {
            step.prefix.extend(intros(deps));
            var_var(step, a, b, left, right)
        }
        (None, None) => {
            step.prefix.extend(intros(deps));
            L::decompose(step, left, right)
        }
    }
}

fn var_var<L: Language>(
    mut step: Step<L>,
    a: Name,
    b: Name,
    left: L::Type,
    right: L::Type,
) -> Result<InferenceState<L>> {
    let top = step.pop()?;
    match top {
        Entry::Intro(x, kind) if x == a => Ok(step.resume([Entry::Def(a, right, kind)])),
        Entry::Intro(x, kind) if x == b => Ok(step.resume([Entry::Def(b, left, kind)])),
        Entry::Def(x, def, kind) if x == a || x == b => {
            let eq = TypeEq::new(left.subst(x, &def), right.subst(x, &def));
            Ok(step.float(eq.into(), Entry::Def(x, def, kind)))
        }
        Entry::Constraint(_) => Err(TypeError::malformed("constraint below the first constraint")),
        top => Ok(step.float(TypeEq::new(left, right).into(), top)),
    }
}

/// Walks a flex-rigid equation down to the intro of its variable.
pub fn walk_flex_rigid<L: Language>(mut step: Step<L>, eq: FlexRigid<L>) -> Result<InferenceState<L>> {
    let top = step.pop()?;
    match top {
        Entry::Intro(x, kind) if x == eq.name => {
            if eq.rigid.mentions(x) {
                return Err(TypeError::OccursCheckFailed {
                    var: x,
                    ty: eq.rigid.to_string(),
                });
            }
            let FlexRigid { deps, rigid, .. } = eq;
            let def = Entry::Def(x, rigid, kind);
            Ok(step.resume(intros(deps).chain([def])))
        }
        Entry::Intro(x, kind) if eq.rigid.mentions(x) => {
            let mut eq = eq;
            eq.deps.insert(0, (x, kind));
            Ok(step.resume([Entry::Constraint(L::suspend(eq))]))
        }
        Entry::Def(x, def, kind) => {
            let FlexRigid {
                deps,
                name,
                flex,
                rigid,
            } = eq;
            let constraint = if x == name || rigid.mentions(x) {
                TypeEq::new(flex.subst(x, &def), rigid.subst(x, &def)).into()
            } else {
                L::suspend(FlexRigid {
                    deps: vec![],
                    name,
                    flex,
                    rigid,
                })
            };
            let top = Entry::Def(x, def, kind);
            Ok(step.resume(intros(deps).chain([Entry::Constraint(constraint), top])))
        }
        Entry::Constraint(_) => Err(TypeError::malformed("constraint below the first constraint")),
        top => Ok(step.float(L::suspend(eq), top)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::Basic;
    use term_core::basic::{Kind, Type};
    use term_core::Scheme;
    use ustr::ustr;

    fn v(name: &str) -> Type {
        Type::var(name)
    }

    fn intro(name: &str) -> Entry<Basic> {
        Entry::Intro(ustr(name), Kind)
    }

    fn def(name: &str, ty: Type) -> Entry<Basic> {
        Entry::Def(ustr(name), ty, Kind)
    }

    fn solve(entries: Vec<Entry<Basic>>) -> Vec<Entry<Basic>> {
        InferenceState::new(FreshVariableStream::new(), entries)
            .unify()
            .unwrap()
            .context
            .to_vec()
    }

    #[test]
    fn dependencies_move_below_the_solved_variable() {
        // a, ;;, x : a, b, c, d := c, [a == b -> d]
        let entries = vec![
            intro("a"),
            Entry::Marker,
            Entry::Bind(ustr("x"), Scheme::mono(v("a"))),
            intro("b"),
            intro("c"),
            def("d", v("c")),
            Entry::constraint(TypeEq::new(v("a"), Type::arrow(v("b"), v("d")))),
        ];
        assert_eq!(
            solve(entries),
            vec![
                intro("b"),
                intro("c"),
                def("a", Type::arrow(v("b"), v("c"))),
                Entry::Marker,
                Entry::Bind(ustr("x"), Scheme::mono(v("a"))),
                def("d", v("c")),
            ]
        );
    }

    #[test]
    fn hoisted_intros_keep_their_order() {
        let state = InferenceState::<Basic>::new(
            FreshVariableStream::new(),
            vec![
                intro("a"),
                intro("b"),
                intro("c"),
                Entry::constraint(TypeEq::new(v("a"), Type::arrow(v("b"), v("c")))),
            ],
        );
        let state = state.step().unwrap().step().unwrap();
        let Some(Entry::Constraint(eq)) = state.context.last() else {
            panic!("expected a pending constraint, got {:?}", state.context.to_vec());
        };
        assert_eq!(eq.deps, vec![(ustr("b"), Kind), (ustr("c"), Kind)]);
        assert_eq!(state.context.len(), 2);
    }

    #[test]
    fn var_var_substitutes_a_definition_first() {
        // a, c, b := c, [b == a]
        let entries = vec![
            intro("a"),
            intro("c"),
            def("b", v("c")),
            Entry::constraint(TypeEq::new(v("b"), v("a"))),
        ];
        assert_eq!(
            solve(entries),
            vec![intro("a"), def("c", v("a")), def("b", v("c"))]
        );
    }

    #[test]
    fn var_var_floats_past_unrelated_entries() {
        let entries = vec![
            intro("a"),
            intro("b"),
            intro("c"),
            def("d", v("c")),
            Entry::constraint(TypeEq::new(v("a"), v("b"))),
        ];
        assert_eq!(
            solve(entries),
            vec![intro("a"), def("b", v("a")), intro("c"), def("d", v("c"))]
        );
    }

    #[test]
    fn occurs_check_on_the_intro() {
        let entries = vec![
            intro("a"),
            Entry::constraint(TypeEq::new(v("a"), Type::arrow(v("a"), v("a")))),
        ];
        let err = InferenceState::new(FreshVariableStream::new(), entries)
            .unify()
            .unwrap_err();
        assert!(matches!(err, TypeError::OccursCheckFailed { .. }));
    }
}
