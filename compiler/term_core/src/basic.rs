//! Types of the plain Hindley-Milner language.

use crate::{HasVariables, Name, Substitute, TypeExpr, P};

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use ustr::ustr;

/// The one kind of the language, `*`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Kind;

/// A type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Var(Name),
    Arrow(P<Type>, P<Type>),
}

pub type Scheme = crate::Scheme<Type, Kind, Infallible>;

impl Type {
    pub fn var(name: &str) -> Self {
        Type::Var(ustr(name))
    }

    pub fn arrow(from: Type, to: Type) -> Self {
        Type::Arrow(P::new(from), P::new(to))
    }

    /// `a -> b -> .. -> z`, nested to the right.
    pub fn arrows(from: impl IntoIterator<Item = Type>, to: Type) -> Self {
        let from: Vec<_> = from.into_iter().collect();
        from.into_iter().rev().fold(to, |to, from| Type::arrow(from, to))
    }
}

impl HasVariables for Type {
    fn free_vars(&self) -> BTreeSet<Name> {
        match self {
            Type::Var(x) => BTreeSet::from([*x]),
            Type::Arrow(a, b) => {
                let mut vars = a.free_vars();
                vars.extend(b.free_vars());
                vars
            }
        }
    }
}

impl Substitute<Type> for Type {
    fn subst_all(&self, map: &BTreeMap<Name, Type>) -> Self {
        match self {
            Type::Var(x) => map.get(x).cloned().unwrap_or_else(|| self.clone()),
            Type::Arrow(a, b) => Type::arrow(a.subst_all(map), b.subst_all(map)),
        }
    }
}

impl TypeExpr for Type {
    fn as_var(&self) -> Option<Name> {
        match self {
            Type::Var(x) => Some(*x),
            Type::Arrow(..) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_nest_to_the_right() {
        let ty = Type::arrows([Type::var("a"), Type::var("b")], Type::var("c"));
        assert_eq!(
            ty,
            Type::arrow(Type::var("a"), Type::arrow(Type::var("b"), Type::var("c")))
        );
    }

    #[test]
    fn substitution_is_simultaneous() {
        let ty = Type::arrow(Type::var("a"), Type::var("b"));
        let map = BTreeMap::from([(ustr("a"), Type::var("b")), (ustr("b"), Type::var("a"))]);
        assert_eq!(ty.subst_all(&map), Type::arrow(Type::var("b"), Type::var("a")));
    }

    #[test]
    fn substituted_names_disappear() {
        let ty = Type::arrow(Type::var("a"), Type::arrow(Type::var("a"), Type::var("c")));
        let out = ty.subst(ustr("a"), &Type::arrow(Type::var("x"), Type::var("y")));
        assert!(!out.mentions(ustr("a")));
        assert_eq!(out.free_vars(), BTreeSet::from([ustr("x"), ustr("y"), ustr("c")]));
    }
}
