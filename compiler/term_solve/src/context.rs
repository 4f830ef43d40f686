use crate::{Language, SchemeOf};
use term_core::{Name, Result, Substitute, TypeError};

use std::collections::BTreeMap;
use std::ops::Deref;

/// An entry of the typing context.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry<L: Language> {
    /// An unsolved type variable.
    Intro(Name, L::Kind),
    /// A solved type variable; the kind is the one it was introduced with.
    Def(Name, L::Type, L::Kind),
    /// A term variable.
    Bind(Name, SchemeOf<L>),
    /// Where the bound term of a `let` starts.
    Marker,
    Decl(L::Decl),
    /// A pending constraint.
    Constraint(L::Constraint),
}

impl<L: Language> Entry<L> {
    pub fn constraint(c: impl Into<L::Constraint>) -> Self {
        Entry::Constraint(c.into())
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, Entry::Constraint(_))
    }
}

/// Re-enters hoisted intros into a context, in order.
pub fn intros<L: Language>(
    deps: impl IntoIterator<Item = (Name, L::Kind)>,
) -> impl Iterator<Item = Entry<L>> {
    deps.into_iter().map(|(name, kind)| Entry::Intro(name, kind))
}

/// The typing context: entries and pending constraints, oldest first.
///
/// Entries only refer to entries before them.
#[derive(Clone, Debug, PartialEq)]
pub struct Context<L: Language> {
    entries: Vec<Entry<L>>,
}

impl<L: Language> Default for Context<L> {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

impl<L: Language> Context<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry<L>) {
        self.entries.push(entry);
    }

    pub fn into_entries(self) -> Vec<Entry<L>> {
        self.entries
    }

    pub fn has_constraints(&self) -> bool {
        self.entries.iter().any(Entry::is_constraint)
    }

    /// The nearest binding of a term variable.
    pub fn lookup(&self, name: Name) -> Option<&SchemeOf<L>> {
        self.entries.iter().rev().find_map(|entry| match entry {
            Entry::Bind(x, scheme) if *x == name => Some(scheme),
            _ => None,
        })
    }

    /// Removes the nearest binding of a term variable.
    pub fn remove_binding(&mut self, name: Name) -> Result<SchemeOf<L>> {
        let at = self
            .entries
            .iter()
            .rposition(|entry| matches!(entry, Entry::Bind(x, _) if *x == name))
            .ok_or_else(|| TypeError::malformed(format!("no binding of `{name}` to remove")))?;
        match self.entries.remove(at) {
            Entry::Bind(_, scheme) => Ok(scheme),
            _ => Err(TypeError::malformed(format!("no binding of `{name}` to remove"))),
        }
    }

    pub fn decls(&self) -> impl Iterator<Item = &L::Decl> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Decl(decl) => Some(decl),
            _ => None,
        })
    }

    /// Rewrites every definition so that it mentions no defined variable.
    #[must_use]
    pub fn normalize(&self) -> Context<L> {
        let mut defs = BTreeMap::new();
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Def(name, def, kind) => {
                    let def = def.subst_all(&defs);
                    defs.insert(*name, def.clone());
                    Entry::Def(*name, def, kind.clone())
                }
                entry => entry.clone(),
            })
            .collect();
        Context { entries }
    }

    /// Substitutes every definition into `t`.
    ///
    /// Later definitions go first, since they may mention earlier ones.
    pub fn apply<T: Substitute<L::Type> + Clone>(&self, t: &T) -> T {
        self.entries
            .iter()
            .rev()
            .fold(t.clone(), |t, entry| match entry {
                Entry::Def(name, def, _) => t.subst(*name, def),
                _ => t,
            })
    }
}

impl<L: Language> Deref for Context<L> {
    type Target = [Entry<L>];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl<L: Language> From<Vec<Entry<L>>> for Context<L> {
    fn from(entries: Vec<Entry<L>>) -> Self {
        Self { entries }
    }
}

impl<L: Language> FromIterator<Entry<L>> for Context<L> {
    fn from_iter<I: IntoIterator<Item = Entry<L>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::Basic;
    use term_core::basic::{Kind, Type};
    use term_core::Scheme;
    use ustr::ustr;

    #[test]
    fn removing_a_binding_uncovers_the_shadowed_one() {
        let x = ustr("x");
        let mut ctx = Context::<Basic>::new();
        ctx.push(Entry::Bind(x, Scheme::mono(Type::var("a"))));
        ctx.push(Entry::Intro(ustr("b"), Kind));
        ctx.push(Entry::Bind(x, Scheme::mono(Type::var("b"))));

        assert_eq!(ctx.remove_binding(x), Ok(Scheme::mono(Type::var("b"))));
        assert_eq!(ctx.lookup(x), Some(&Scheme::mono(Type::var("a"))));
        assert_eq!(ctx.len(), 2);

        assert!(ctx.remove_binding(x).is_ok());
        assert!(ctx.lookup(x).is_none());
        assert!(ctx.remove_binding(x).unwrap_err().is_internal());
    }
}
