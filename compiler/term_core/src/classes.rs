//! Types, kinds and predicates of the language with type classes.

use crate::{HasVariables, Name, Qualified, Result, Substitute, TypeError, TypeExpr, P};

use std::collections::{BTreeMap, BTreeSet};
use ustr::ustr;

/// A kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// The kind of value types, `*`.
    Data,
    Arrow(P<Kind>, P<Kind>),
}

impl Kind {
    pub fn arrow(from: Kind, to: Kind) -> Self {
        Kind::Arrow(P::new(from), P::new(to))
    }

    /// The kind of a constructor taking `arity` value types.
    pub fn constructor(arity: usize) -> Self {
        (0..arity).fold(Kind::Data, |kind, _| Kind::arrow(Kind::Data, kind))
    }
}

/// A type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Var(Name, Kind),
    Con(Name, Kind),
    App(P<Type>, P<Type>),
}

pub const ARROW: &str = "->";

impl Type {
    pub fn var(name: &str, kind: Kind) -> Self {
        Type::Var(ustr(name), kind)
    }

    /// A value-kinded variable.
    pub fn data(name: &str) -> Self {
        Type::var(name, Kind::Data)
    }

    pub fn con(name: &str, kind: Kind) -> Self {
        Type::Con(ustr(name), kind)
    }

    /// A value-kinded constant, such as `int`.
    pub fn prim(name: &str) -> Self {
        Type::con(name, Kind::Data)
    }

    pub fn app(func: Type, arg: Type) -> Self {
        Type::App(P::new(func), P::new(arg))
    }

    pub fn fun(from: Type, to: Type) -> Self {
        let arrow = Type::con(ARROW, Kind::constructor(2));
        Type::app(Type::app(arrow, from), to)
    }

    /// `a -> b -> .. -> z`, nested to the right.
    pub fn funs(from: impl IntoIterator<Item = Type>, to: Type) -> Self {
        let from: Vec<_> = from.into_iter().collect();
        from.into_iter().rev().fold(to, |to, from| Type::fun(from, to))
    }

    /// The argument and result of a function type.
    pub fn as_fun(&self) -> Option<(&Type, &Type)> {
        match self {
            Type::App(f, to) => match f.as_ref() {
                Type::App(arrow, from) => match arrow.as_ref() {
                    Type::Con(name, _) if name.as_str() == ARROW => Some((from, to)),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    pub fn kind(&self) -> Result<Kind> {
        match self {
            Type::Var(_, kind) | Type::Con(_, kind) => Ok(kind.clone()),
            Type::App(func, arg) => match func.kind()? {
                Kind::Arrow(from, to) => {
                    let found = arg.kind()?;
                    if *from == found {
                        Ok(*to)
                    } else {
                        Err(TypeError::kind_mismatch(&from, &found))
                    }
                }
                Kind::Data => Err(TypeError::KindMismatch {
                    expected: "k1 -> k2".to_owned(),
                    found: Kind::Data.to_string(),
                }),
            },
        }
    }

    /// Whether the type is headed by a variable.
    pub fn is_head_normal(&self) -> bool {
        match self {
            Type::Var(..) => true,
            Type::Con(..) => false,
            Type::App(func, _) => func.is_head_normal(),
        }
    }

    /// One-way matching: a substitution `s` with `s(self) == other`.
    pub fn match_type(&self, other: &Type) -> Option<Subst> {
        match (self, other) {
            (Type::Var(x, kind), _) => match other.kind() {
                Ok(found) if found == *kind => Some(Subst::single(*x, other.clone())),
                _ => None,
            },
            (Type::Con(a, _), Type::Con(b, _)) if a == b => Some(Subst::empty()),
            (Type::App(f1, a1), Type::App(f2, a2)) => {
                f1.match_type(f2)?.merge(a1.match_type(a2)?)
            }
            _ => None,
        }
    }

    /// The most general unifier of two types, if there is one.
    pub fn unify(&self, other: &Type) -> Option<Subst> {
        match (self, other) {
            (Type::Var(x, kind), t) | (t, Type::Var(x, kind)) => bind_var(*x, kind, t),
            (Type::Con(a, _), Type::Con(b, _)) if a == b => Some(Subst::empty()),
            (Type::App(f1, a1), Type::App(f2, a2)) => {
                let s1 = f1.unify(f2)?;
                let s2 = s1.apply(a1.as_ref()).unify(&s1.apply(a2.as_ref()))?;
                Some(s2.compose(&s1))
            }
            _ => None,
        }
    }

    /// Whether some instantiation makes both types equal.
    pub fn overlaps(&self, other: &Type) -> bool {
        self.unify(other).is_some()
    }
}

fn bind_var(x: Name, kind: &Kind, t: &Type) -> Option<Subst> {
    if let Type::Var(y, _) = t {
        if *y == x {
            return Some(Subst::empty());
        }
    }
    match t.kind() {
        Ok(found) if found == *kind && !t.mentions(x) => Some(Subst::single(x, t.clone())),
        _ => None,
    }
}

impl HasVariables for Type {
    fn free_vars(&self) -> BTreeSet<Name> {
        match self {
            Type::Var(x, _) => BTreeSet::from([*x]),
            Type::Con(..) => BTreeSet::new(),
            Type::App(func, arg) => {
                let mut vars = func.free_vars();
                vars.extend(arg.free_vars());
                vars
            }
        }
    }
}

impl Substitute<Type> for Type {
    fn subst_all(&self, map: &BTreeMap<Name, Type>) -> Self {
        match self {
            Type::Var(x, _) => map.get(x).cloned().unwrap_or_else(|| self.clone()),
            Type::Con(..) => self.clone(),
            Type::App(func, arg) => Type::app(func.subst_all(map), arg.subst_all(map)),
        }
    }
}

impl TypeExpr for Type {
    fn as_var(&self) -> Option<Name> {
        match self {
            Type::Var(x, _) => Some(*x),
            _ => None,
        }
    }
}

/// A finite map from variables to types, applied simultaneously.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subst(BTreeMap<Name, Type>);

impl Subst {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(name: Name, ty: Type) -> Self {
        Self(BTreeMap::from([(name, ty)]))
    }

    pub fn get(&self, name: Name) -> Option<&Type> {
        self.0.get(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn apply<T: Substitute<Type>>(&self, t: &T) -> T {
        t.subst_all(&self.0)
    }

    /// `self ∘ other`: applying the result is applying `other`, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Subst) -> Subst {
        let mut map: BTreeMap<_, _> = other.0.iter().map(|(x, t)| (*x, self.apply(t))).collect();
        for (x, t) in &self.0 {
            map.entry(*x).or_insert_with(|| t.clone());
        }
        Subst(map)
    }

    /// The union of two matches; fails when they disagree on a variable.
    pub fn merge(mut self, other: Subst) -> Option<Subst> {
        for (x, t) in other.0 {
            match self.0.get(&x) {
                Some(existing) if *existing != t => return None,
                Some(_) => {}
                None => {
                    self.0.insert(x, t);
                }
            }
        }
        Some(self)
    }
}

/// A class constraint on a type, `C τ`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Predicate {
    pub class: Name,
    pub arg: Type,
}

impl Predicate {
    pub fn new(class: &str, arg: Type) -> Self {
        Self {
            class: ustr(class),
            arg,
        }
    }

    pub fn is_head_normal(&self) -> bool {
        self.arg.is_head_normal()
    }
}

impl HasVariables for Predicate {
    fn free_vars(&self) -> BTreeSet<Name> {
        self.arg.free_vars()
    }
}

impl Substitute<Type> for Predicate {
    fn subst_all(&self, map: &BTreeMap<Name, Type>) -> Self {
        Self {
            class: self.class,
            arg: self.arg.subst_all(map),
        }
    }
}

pub type QualifiedType = Qualified<Type, Predicate>;
pub type TypeScheme = crate::Scheme<Type, Kind, Predicate>;

/// A class together with its instances, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: Name,
    pub instances: Vec<TypeScheme>,
}

impl ClassDecl {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            instances: vec![],
        }
    }
}
