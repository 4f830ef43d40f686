//! Types of the units-of-measure language and the unit algebra.
//!
//! Unit-kinded types form a free Abelian group over unit variables and
//! primitive units. [`Unit`] is the normal form of such a type: an exponent
//! per variable and per primitive, with zero exponents dropped.

use crate::{FreshVariableStream, HasVariables, Name, Result, Substitute, TypeError, TypeExpr, P};

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use ustr::ustr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Value types, `*`.
    Value,
    /// Units of measure, `#`.
    Unit,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Var(Name),
    Arrow(P<Type>, P<Type>),
    /// A float carrying a unit.
    Float(P<Type>),
    /// The dimensionless unit, `1`.
    UnitIdentity,
    UnitMul(P<Type>, P<Type>),
    UnitPow(P<Type>, i32),
    /// A primitive unit such as `kg`.
    Prim(Name),
}

pub type Scheme = crate::Scheme<Type, Kind, Infallible>;

impl Type {
    pub fn var(name: &str) -> Self {
        Type::Var(ustr(name))
    }

    pub fn prim(name: &str) -> Self {
        Type::Prim(ustr(name))
    }

    pub fn arrow(from: Type, to: Type) -> Self {
        Type::Arrow(P::new(from), P::new(to))
    }

    /// `a -> b -> .. -> z`, nested to the right.
    pub fn arrows(from: impl IntoIterator<Item = Type>, to: Type) -> Self {
        let from: Vec<_> = from.into_iter().collect();
        from.into_iter().rev().fold(to, |to, from| Type::arrow(from, to))
    }

    pub fn float(unit: Type) -> Self {
        Type::Float(P::new(unit))
    }

    pub fn mul(left: Type, right: Type) -> Self {
        Type::UnitMul(P::new(left), P::new(right))
    }

    pub fn pow(base: Type, exponent: i32) -> Self {
        Type::UnitPow(P::new(base), exponent)
    }

    /// Reads a unit-kinded type as a unit.
    pub fn to_unit(&self) -> Result<Unit> {
        match self {
            Type::Var(x) => Ok(Unit::var(*x)),
            Type::Prim(p) => Ok(Unit::prim(*p)),
            Type::UnitIdentity => Ok(Unit::identity()),
            Type::UnitMul(a, b) => a.to_unit()?.add(&b.to_unit()?),
            Type::UnitPow(base, e) => base.to_unit()?.scale(*e),
            Type::Arrow(..) | Type::Float(_) => {
                Err(TypeError::kind_mismatch(&Kind::Unit, &Kind::Value))
            }
        }
    }

    /// Rewrites every unit inside the type into its canonical form.
    pub fn canonical(&self) -> Result<Type> {
        match self {
            Type::Var(_) | Type::Prim(_) | Type::UnitIdentity => Ok(self.clone()),
            Type::Arrow(a, b) => Ok(Type::arrow(a.canonical()?, b.canonical()?)),
            Type::Float(unit) => Ok(Type::float(unit.to_unit()?.to_type())),
            Type::UnitMul(..) | Type::UnitPow(..) => Ok(self.to_unit()?.to_type()),
        }
    }

    /// Splits a value type into its shape and its units.
    ///
    /// Every float's unit is replaced by a fresh `h` variable; the pairs
    /// `(h, unit)` name what each hole stood for. Variables are their own hull.
    pub fn make_hull(
        &self,
        fresh: &FreshVariableStream,
    ) -> Result<(FreshVariableStream, Type, Vec<(Name, Type)>)> {
        match self {
            Type::Var(_) => Ok((fresh.clone(), self.clone(), vec![])),
            Type::Arrow(a, b) => {
                let (fresh, a, mut holes) = a.make_hull(fresh)?;
                let (fresh, b, more) = b.make_hull(&fresh)?;
                holes.extend(more);
                Ok((fresh, Type::arrow(a, b), holes))
            }
            Type::Float(unit) => {
                let (fresh, h) = fresh.next("h");
                Ok((fresh, Type::float(Type::Var(h)), vec![(h, (**unit).clone())]))
            }
            Type::UnitIdentity | Type::UnitMul(..) | Type::UnitPow(..) | Type::Prim(_) => {
                Err(TypeError::kind_mismatch(&Kind::Value, &Kind::Unit))
            }
        }
    }
}

impl HasVariables for Type {
    fn free_vars(&self) -> BTreeSet<Name> {
        match self {
            Type::Var(x) => BTreeSet::from([*x]),
            Type::Arrow(a, b) | Type::UnitMul(a, b) => {
                let mut vars = a.free_vars();
                vars.extend(b.free_vars());
                vars
            }
            Type::Float(t) | Type::UnitPow(t, _) => t.free_vars(),
            Type::UnitIdentity | Type::Prim(_) => BTreeSet::new(),
        }
    }
}

impl Substitute<Type> for Type {
    /// Units under a float are renormalized after substitution; if the
    /// replacement was not a unit the substituted form is kept as is.
    fn subst_all(&self, map: &BTreeMap<Name, Type>) -> Self {
        match self {
            Type::Var(x) => map.get(x).cloned().unwrap_or_else(|| self.clone()),
            Type::Arrow(a, b) => Type::arrow(a.subst_all(map), b.subst_all(map)),
            Type::Float(unit) => {
                let unit = unit.subst_all(map);
                match unit.to_unit() {
                    Ok(normal) => Type::float(normal.to_type()),
                    Err(_) => Type::float(unit),
                }
            }
            Type::UnitMul(a, b) => Type::mul(a.subst_all(map), b.subst_all(map)),
            Type::UnitPow(t, e) => Type::pow(t.subst_all(map), *e),
            Type::UnitIdentity | Type::Prim(_) => self.clone(),
        }
    }
}

impl TypeExpr for Type {
    fn as_var(&self) -> Option<Name> {
        match self {
            Type::Var(x) => Some(*x),
            _ => None,
        }
    }
}

/// A unit in normal form.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit {
    vars: BTreeMap<Name, i32>,
    consts: BTreeMap<Name, i32>,
}

impl Unit {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn var(name: Name) -> Self {
        Self {
            vars: BTreeMap::from([(name, 1)]),
            consts: BTreeMap::new(),
        }
    }

    pub fn prim(name: Name) -> Self {
        Self {
            vars: BTreeMap::new(),
            consts: BTreeMap::from([(name, 1)]),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.vars.is_empty() && self.consts.is_empty()
    }

    /// No variables left to solve for.
    pub fn is_constant(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn exponent_of(&self, var: Name) -> i32 {
        self.vars.get(&var).copied().unwrap_or(0)
    }

    pub fn variables(&self) -> impl Iterator<Item = (Name, i32)> + '_ {
        self.vars.iter().map(|(x, e)| (*x, *e))
    }

    pub fn constants(&self) -> impl Iterator<Item = (Name, i32)> + '_ {
        self.consts.iter().map(|(x, e)| (*x, *e))
    }

    pub fn variable_count(&self) -> usize {
        self.vars.len()
    }

    /// Whether `d` divides every exponent, of variables and constants alike.
    pub fn divides_powers(&self, d: i32) -> bool {
        let d = i64::from(d);
        d != 0
            && self
                .vars
                .values()
                .chain(self.consts.values())
                .all(|e| i64::from(*e) % d == 0)
    }

    /// Whether some other variable has an exponent at least as large as `var`'s.
    pub fn not_max(&self, var: Name) -> bool {
        let e = self.exponent_of(var).unsigned_abs();
        self.vars
            .iter()
            .any(|(x, f)| *x != var && f.unsigned_abs() >= e)
    }

    // The arithmetic below fails with `UnitMismatch` once an exponent
    // leaves the range of `i32`.

    pub fn invert(&self) -> Result<Unit> {
        self.scale(-1)
    }

    pub fn add(&self, other: &Unit) -> Result<Unit> {
        Ok(Unit {
            vars: combine(&self.vars, &other.vars).ok_or_else(|| out_of_range(self))?,
            consts: combine(&self.consts, &other.consts).ok_or_else(|| out_of_range(self))?,
        })
    }

    pub fn subtract(&self, other: &Unit) -> Result<Unit> {
        self.add(&other.invert()?)
    }

    pub fn scale(&self, factor: i32) -> Result<Unit> {
        self.map_exponents(|e| e.checked_mul(factor))
    }

    /// Divides every exponent by `d`, truncating toward zero.
    pub fn divide(&self, d: i32) -> Result<Unit> {
        self.map_exponents(|e| e.checked_div(d))
    }

    /// Solves `self = 1` for `var`, as far as integer exponents allow.
    ///
    /// With `self = var^e * rest` this is `rest^(-1/e)`, each exponent
    /// truncated.
    pub fn pivot(&self, var: Name) -> Result<Unit> {
        let e = self.exponent_of(var);
        if e == 0 {
            return Ok(Unit::identity());
        }
        self.subtract(&Unit::var(var).scale(e)?)?.divide(e)?.invert()
    }

    /// Replaces `var` by `with`.
    pub fn substitute(&self, var: Name, with: &Unit) -> Result<Unit> {
        let e = self.exponent_of(var);
        with.subtract(&Unit::var(var))?.scale(e)?.add(self)
    }

    fn map_exponents(&self, f: impl Fn(i32) -> Option<i32>) -> Result<Unit> {
        let map = |exps: &BTreeMap<Name, i32>| -> Option<BTreeMap<Name, i32>> {
            exps.iter()
                .map(|(x, e)| Some((*x, f(*e)?)))
                .filter(|entry| !matches!(entry, Some((_, 0))))
                .collect()
        };
        Ok(Unit {
            vars: map(&self.vars).ok_or_else(|| out_of_range(self))?,
            consts: map(&self.consts).ok_or_else(|| out_of_range(self))?,
        })
    }

    /// The canonical type of this unit: variable powers in name order, then
    /// primitive powers, multiplied left to right.
    pub fn to_type(&self) -> Type {
        let vars = self.vars.iter().map(|(x, e)| Type::pow(Type::Var(*x), *e));
        let consts = self.consts.iter().map(|(p, e)| Type::pow(Type::Prim(*p), *e));
        vars.chain(consts)
            .reduce(Type::mul)
            .unwrap_or(Type::UnitIdentity)
    }
}

fn combine(left: &BTreeMap<Name, i32>, right: &BTreeMap<Name, i32>) -> Option<BTreeMap<Name, i32>> {
    let mut out = left.clone();
    for (x, e) in right {
        let sum = out.get(x).copied().unwrap_or(0).checked_add(*e)?;
        if sum == 0 {
            out.remove(x);
        } else {
            out.insert(*x, sum);
        }
    }
    Some(out)
}

fn out_of_range(unit: &Unit) -> TypeError {
    TypeError::UnitMismatch(unit.to_string())
}

impl HasVariables for Unit {
    fn free_vars(&self) -> BTreeSet<Name> {
        self.vars.keys().copied().collect()
    }
}
