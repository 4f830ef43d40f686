//! Hindley-Milner with units of measure.
//!
//! Equations between floats become equations between units, which are
//! solved in the Abelian group of units rather than syntactically. A
//! variable equated with a type containing floats is first matched against
//! the type's hull, the same shape with a fresh unit variable per float.

use crate::machine::{self, FlexRigid, Solve};
use crate::{hm, intros, Entry, InferenceState, Language, Options, Step, TypeEq};
use term_core::units::{Kind, Type, Unit};
use term_core::{Name, Result, Term, TypeError};

use std::convert::Infallible;
use std::iter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Units;

#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    Eq(TypeEq<Units>),
    /// A variable equated with a hull.
    Hull(FlexRigid<Units>),
    Unit(UnitEq),
}

impl From<TypeEq<Units>> for Constraint {
    fn from(eq: TypeEq<Units>) -> Self {
        Constraint::Eq(eq)
    }
}

impl From<UnitEq> for Constraint {
    fn from(eq: UnitEq) -> Self {
        Constraint::Unit(eq)
    }
}

impl Solve<Units> for Constraint {
    fn solve(self, step: Step<Units>) -> Result<InferenceState<Units>> {
        match self {
            Constraint::Eq(eq) => machine::solve_type_eq(step, eq),
            Constraint::Hull(eq) => machine::walk_flex_rigid(step, eq),
            Constraint::Unit(eq) => eq.solve(step),
        }
    }
}

/// `equation == 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitEq {
    /// Intros lifted out of the context on the way down.
    pub deps: Vec<(Name, Kind)>,
    pub equation: Unit,
}

impl UnitEq {
    pub fn new(equation: Unit) -> Self {
        Self {
            deps: vec![],
            equation,
        }
    }

    fn solve(self, mut step: Step<Units>) -> Result<InferenceState<Units>> {
        let UnitEq { mut deps, equation } = self;
        if equation.is_identity() {
            return Ok(step.resume(intros(deps)));
        }
        if equation.is_constant() {
            return Err(TypeError::UnitMismatch(equation.to_string()));
        }

        let top = step.pop()?;
        match top {
            Entry::Def(x, def, kind) if equation.exponent_of(x) != 0 => {
                let equation = equation.substitute(x, &def.to_unit()?)?;
                let rest = [Entry::constraint(UnitEq::new(equation)), Entry::Def(x, def, kind)];
                Ok(step.resume(intros(deps).chain(rest)))
            }
            Entry::Intro(x, kind) if equation.exponent_of(x) != 0 => {
                let e = equation.exponent_of(x);
                if equation.divides_powers(e) {
                    let def = Entry::Def(x, equation.pivot(x)?.to_type(), kind);
                    Ok(step.resume(intros(deps).chain([def])))
                } else if equation.not_max(x) {
                    let (fresh, b) = step.fresh.next("b");
                    step.fresh = fresh;
                    let solution = equation.pivot(x)?.add(&Unit::var(b))?;
                    // the solution may mention the hoisted intros
                    let reduced = UnitEq::new(equation.substitute(x, &solution)?);
                    let rest = [
                        Entry::constraint(reduced),
                        Entry::Def(x, solution.to_type(), kind),
                    ];
                    Ok(step.resume(
                        iter::once(Entry::Intro(b, Kind::Unit))
                            .chain(intros(deps))
                            .chain(rest),
                    ))
                } else if equation.variable_count() > 1 {
                    deps.insert(0, (x, kind));
                    Ok(step.resume([Entry::constraint(UnitEq { deps, equation })]))
                } else {
                    Err(TypeError::UnitMismatch(equation.to_string()))
                }
            }
            Entry::Constraint(_) => Err(TypeError::malformed("constraint below the first constraint")),
            top => Ok(step.float(UnitEq { deps, equation }.into(), top)),
        }
    }
}

impl Language for Units {
    type Kind = Kind;
    type Type = Type;
    type Pred = Infallible;
    type Decl = Infallible;
    type Constraint = Constraint;

    fn value_kind() -> Kind {
        Kind::Value
    }

    fn var(name: Name, _: &Kind) -> Type {
        Type::Var(name)
    }

    fn arrow(from: Type, to: Type) -> Type {
        Type::arrow(from, to)
    }

    fn decompose(step: Step<Self>, left: Type, right: Type) -> Result<InferenceState<Self>> {
        match (left, right) {
            (Type::Arrow(a, b), Type::Arrow(c, d)) => Ok(step.resume([
                Entry::constraint(TypeEq::new(*a, *c)),
                Entry::constraint(TypeEq::new(*b, *d)),
            ])),
            (Type::Float(u), Type::Float(v)) => {
                let equation = u.to_unit()?.subtract(&v.to_unit()?)?;
                Ok(step.resume([Entry::constraint(UnitEq::new(equation))]))
            }
            (left, right) => Err(TypeError::mismatch(&left, &right)),
        }
    }

    /// Replaces the rigid side by its hull and solves for the units the
    /// hull left out separately.
    fn flex_rigid(mut step: Step<Self>, eq: FlexRigid<Self>) -> Result<InferenceState<Self>> {
        let FlexRigid {
            mut deps,
            name,
            flex,
            rigid,
        } = eq;
        let (fresh, hull, holes) = rigid.make_hull(&step.fresh)?;
        step.fresh = fresh;
        deps.extend(holes.iter().map(|(h, _)| (*h, Kind::Unit)));

        let mut units = Vec::with_capacity(holes.len());
        for (h, unit) in &holes {
            let equation = Unit::var(*h).subtract(&unit.to_unit()?)?;
            units.push(Entry::constraint(UnitEq::new(equation)));
        }
        let hull = FlexRigid {
            deps,
            name,
            flex,
            rigid: hull,
        };
        Ok(step.resume(iter::once(Entry::Constraint(Constraint::Hull(hull))).chain(units)))
    }

    fn suspend(eq: FlexRigid<Self>) -> Constraint {
        Constraint::Hull(eq)
    }

    fn literal(state: InferenceState<Self>, _: f64) -> Result<(InferenceState<Self>, Type)> {
        Ok((state, Type::float(Type::UnitIdentity)))
    }

    fn finish(ty: Type) -> Result<Type> {
        ty.canonical()
    }
}

pub fn infer(initial: InferenceState<Units>, term: &Term) -> Result<Type> {
    infer_with(initial, term, &Options::normal())
}

pub fn infer_with(initial: InferenceState<Units>, term: &Term, options: &Options) -> Result<Type> {
    Ok(hm::infer_with(initial, term, options)?.head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use term_common::FreshVariableStream;
    use ustr::ustr;

    fn unit(name: &str) -> Entry<Units> {
        Entry::Intro(ustr(name), Kind::Unit)
    }

    fn run(entries: Vec<Entry<Units>>) -> InferenceState<Units> {
        InferenceState::new(FreshVariableStream::new(), entries)
    }

    fn kg() -> Unit {
        Unit::prim(ustr("kg"))
    }

    #[test]
    fn definitions_are_substituted_into_the_equation() {
        // x, y := x^2, [z | y kg^-2 == 1]
        let y_def = Entry::Def(ustr("y"), Type::pow(Type::var("x"), 2), Kind::Unit);
        let equation = Unit::var(ustr("y")).subtract(&kg().scale(2).unwrap()).unwrap();
        let state = run(vec![
            unit("x"),
            y_def.clone(),
            Entry::constraint(UnitEq {
                deps: vec![(ustr("z"), Kind::Unit)],
                equation,
            }),
        ]);

        let reduced = Unit::var(ustr("x"))
            .scale(2)
            .and_then(|x| x.subtract(&kg().scale(2)?))
            .unwrap();
        let state = state.step().unwrap();
        assert_eq!(
            state.context.to_vec(),
            vec![
                unit("x"),
                unit("z"),
                Entry::constraint(UnitEq::new(reduced)),
                y_def.clone(),
            ]
        );

        let solved = state.unify().unwrap();
        assert_eq!(
            solved.context.to_vec(),
            vec![
                Entry::Def(ustr("x"), Type::pow(Type::prim("kg"), 1), Kind::Unit),
                unit("z"),
                y_def,
            ]
        );
    }

    #[test]
    fn identity_equation_returns_its_intros() {
        let state = run(vec![
            unit("a"),
            Entry::constraint(UnitEq {
                deps: vec![(ustr("b"), Kind::Unit), (ustr("c"), Kind::Unit)],
                equation: Unit::identity(),
            }),
        ]);
        let solved = state.unify().unwrap();
        assert_eq!(solved.context.to_vec(), vec![unit("a"), unit("b"), unit("c")]);
    }

    #[test]
    fn constant_equation_is_a_mismatch() {
        let state = run(vec![unit("a"), Entry::constraint(UnitEq::new(kg()))]);
        assert!(matches!(state.unify(), Err(TypeError::UnitMismatch(_))));
    }

    #[test]
    fn equation_floats_past_unrelated_intros() {
        // x, y, [x kg^-1 == 1]
        let equation = Unit::var(ustr("x")).subtract(&kg()).unwrap();
        let state = run(vec![unit("x"), unit("y"), Entry::constraint(UnitEq::new(equation))]);
        let solved = state.unify().unwrap();
        assert_eq!(
            solved.context.to_vec(),
            vec![
                Entry::Def(ustr("x"), Type::pow(Type::prim("kg"), 1), Kind::Unit),
                unit("y"),
            ]
        );
    }
}
