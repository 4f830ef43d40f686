use crate::Name;

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::fmt;

/// Values that mention type variables.
pub trait HasVariables {
    fn free_vars(&self) -> BTreeSet<Name>;

    fn mentions(&self, name: Name) -> bool {
        self.free_vars().contains(&name)
    }
}

/// Substitution of `T`s for variables.
///
/// `subst_all` replaces every mapped variable at once, so a replacement
/// that mentions another mapped name is left alone.
pub trait Substitute<T>: HasVariables + Sized {
    #[must_use]
    fn subst_all(&self, map: &BTreeMap<Name, T>) -> Self;

    #[must_use]
    fn subst(&self, name: Name, with: &T) -> Self
    where
        T: Clone,
    {
        self.subst_all(&BTreeMap::from([(name, with.clone())]))
    }
}

/// A type of one of the inference languages.
pub trait TypeExpr: Substitute<Self> + Clone + PartialEq + fmt::Debug + fmt::Display {
    /// The variable name when this type is a bare variable.
    fn as_var(&self) -> Option<Name>;

    fn is_var(&self) -> bool {
        self.as_var().is_some()
    }
}

impl HasVariables for Infallible {
    fn free_vars(&self) -> BTreeSet<Name> {
        match *self {}
    }
}

impl<T> Substitute<T> for Infallible {
    fn subst_all(&self, _: &BTreeMap<Name, T>) -> Self {
        match *self {}
    }
}

impl<V: HasVariables> HasVariables for Vec<V> {
    fn free_vars(&self) -> BTreeSet<Name> {
        self.iter().flat_map(HasVariables::free_vars).collect()
    }
}

impl<T, V: Substitute<T>> Substitute<T> for Vec<V> {
    fn subst_all(&self, map: &BTreeMap<Name, T>) -> Self {
        self.iter().map(|v| v.subst_all(map)).collect()
    }
}
