//! Plain Hindley-Milner.

use crate::{hm, Entry, InferenceState, Language, Options, Step, TypeEq};
use term_core::basic::{Kind, Type};
use term_core::{Name, Result, Term, TypeError};

use std::convert::Infallible;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Basic;

impl Language for Basic {
    type Kind = Kind;
    type Type = Type;
    type Pred = Infallible;
    type Decl = Infallible;
    type Constraint = TypeEq<Basic>;

    fn value_kind() -> Kind {
        Kind
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
            (left, right) => Err(TypeError::mismatch(&left, &right)),
        }
    }
}

pub fn infer(initial: InferenceState<Basic>, term: &Term) -> Result<Type> {
    infer_with(initial, term, &Options::normal())
}

pub fn infer_with(initial: InferenceState<Basic>, term: &Term, options: &Options) -> Result<Type> {
    Ok(hm::infer_with(initial, term, options)?.head)
}
