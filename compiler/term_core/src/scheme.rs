use crate::{FreshVariableStream, HasVariables, Name, Substitute};

use std::collections::{BTreeMap, BTreeSet};

/// A type under a list of predicates, `P => T`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qualified<T, P> {
    pub predicates: Vec<P>,
    pub head: T,
}

impl<T, P> Qualified<T, P> {
    pub fn new(predicates: Vec<P>, head: T) -> Self {
        Self { predicates, head }
    }

    pub fn unqualified(head: T) -> Self {
        Self::new(vec![], head)
    }
}

impl<T: HasVariables, P: HasVariables> HasVariables for Qualified<T, P> {
    fn free_vars(&self) -> BTreeSet<Name> {
        let mut vars = self.head.free_vars();
        vars.extend(self.predicates.free_vars());
        vars
    }
}

impl<T: Substitute<T>, P: Substitute<T>> Substitute<T> for Qualified<T, P> {
    fn subst_all(&self, map: &BTreeMap<Name, T>) -> Self {
        Self {
            predicates: self.predicates.subst_all(map),
            head: self.head.subst_all(map),
        }
    }
}

/// A type scheme, `∀ vs. P => T`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheme<T, K, P> {
    pub quantified: Vec<(Name, K)>,
    pub body: Qualified<T, P>,
}

impl<T, K, P> Scheme<T, K, P> {
    pub fn new(quantified: Vec<(Name, K)>, body: Qualified<T, P>) -> Self {
        Self { quantified, body }
    }

    /// A scheme with nothing quantified.
    pub fn mono(head: T) -> Self {
        Self::new(vec![], Qualified::unqualified(head))
    }

    pub fn poly(quantified: Vec<(Name, K)>, head: T) -> Self {
        Self::new(quantified, Qualified::unqualified(head))
    }

    pub fn is_mono(&self) -> bool {
        self.quantified.is_empty()
    }
}

impl<T, K, P> Scheme<T, K, P>
where
    T: Substitute<T>,
    K: Clone,
    P: Substitute<T>,
{
    /// Renames every quantified variable to a fresh `prefix` name.
    ///
    /// Returns the advanced stream, the fresh names with their kinds in
    /// quantifier order, and the renamed body.
    pub fn instantiate(
        &self,
        fresh: &FreshVariableStream,
        prefix: &str,
        var: impl Fn(Name, &K) -> T,
    ) -> (FreshVariableStream, Vec<(Name, K)>, Qualified<T, P>) {
        let (fresh, names) = fresh.take(prefix, self.quantified.len());
        let mut map = BTreeMap::new();
        let mut intros = Vec::with_capacity(names.len());
        for ((old, kind), new) in self.quantified.iter().zip(names) {
            map.insert(*old, var(new, kind));
            intros.push((new, kind.clone()));
        }
        (fresh, intros, self.body.subst_all(&map))
    }
}

impl<T: HasVariables, K, P: HasVariables> HasVariables for Scheme<T, K, P> {
    fn free_vars(&self) -> BTreeSet<Name> {
        let mut vars = self.body.free_vars();
        for (name, _) in &self.quantified {
            vars.remove(name);
        }
        vars
    }
}
