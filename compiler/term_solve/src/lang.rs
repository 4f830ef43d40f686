use crate::machine::{self, FlexRigid, Solve, Step, TypeEq};
use crate::{Context, InferenceState};
use term_core::{Name, Qualified, Result, Scheme, Substitute, Term, TypeError, TypeExpr};
use term_print::PrettyPrint;

use std::fmt;

/// A type language the engine infers types for.
///
/// The solving machine and the driver are written once against this trait.
/// A language names its kinds, types, predicates, declarations and
/// constraints, and supplies the few rewrites that differ between languages:
/// rigid-rigid decomposition, flex-rigid preprocessing, literal typing,
/// predicate reduction and finishing the result type.
pub trait Language: Sized + Clone + fmt::Debug + PartialEq + 'static {
    type Kind: Clone + PartialEq + fmt::Debug + PrettyPrint<()>;
    type Type: TypeExpr + PrettyPrint<()>;
    type Pred: Substitute<Self::Type> + Clone + PartialEq + fmt::Debug + PrettyPrint<()>;
    type Decl: Clone + PartialEq + fmt::Debug + PrettyPrint<()>;
    type Constraint: Solve<Self>
        + From<TypeEq<Self>>
        + Clone
        + PartialEq
        + fmt::Debug
        + PrettyPrint<()>;

    /// The kind of lambda-bound and result variables.
    fn value_kind() -> Self::Kind;

    fn var(name: Name, kind: &Self::Kind) -> Self::Type;

    fn arrow(from: Self::Type, to: Self::Type) -> Self::Type;

    /// Rewrites an equation between two types that are not variables.
    fn decompose(
        step: Step<Self>,
        left: Self::Type,
        right: Self::Type,
    ) -> Result<InferenceState<Self>>;

    /// Handles an equation between a variable and a non-variable type.
    fn flex_rigid(step: Step<Self>, eq: FlexRigid<Self>) -> Result<InferenceState<Self>> {
        machine::walk_flex_rigid(step, eq)
    }

    /// The constraint a flex-rigid equation becomes while it walks down
    /// the context.
    fn suspend(eq: FlexRigid<Self>) -> Self::Constraint {
        TypeEq::from(eq).into()
    }

    /// The type of a float literal.
    fn literal(
        _state: InferenceState<Self>,
        value: f64,
    ) -> Result<(InferenceState<Self>, Self::Type)> {
        Err(TypeError::UnsupportedTerm(Term::Float(value).to_string()))
    }

    /// Simplifies the predicates of an inferred type.
    fn reduce(preds: Vec<Self::Pred>, _ctx: &Context<Self>) -> Result<Vec<Self::Pred>> {
        Ok(preds)
    }

    /// Last rewrite of the result type.
    fn finish(ty: Self::Type) -> Result<Self::Type> {
        Ok(ty)
    }
}

pub type SchemeOf<L> =
    Scheme<<L as Language>::Type, <L as Language>::Kind, <L as Language>::Pred>;
pub type QualifiedOf<L> = Qualified<<L as Language>::Type, <L as Language>::Pred>;
