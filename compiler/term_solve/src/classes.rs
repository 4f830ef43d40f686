//! Hindley-Milner with type classes.
//!
//! Class declarations sit in the context next to the entries. Predicates
//! collected while inferring are reduced to head-normal form against the
//! instances in scope and simplified by entailment.

use crate::{hm, Context, Entry, InferenceState, Language, Options, Step, TypeEq};
use crate::machine::{self, FlexRigid};
use term_common::FreshVariableStream;
use term_core::classes::{ClassDecl, Kind, Predicate, QualifiedType, Type, TypeScheme};
use term_core::{Name, Result, Term, TypeError};

use std::collections::BTreeSet;
use ustr::ustr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classes;

impl Language for Classes {
    type Kind = Kind;
    type Type = Type;
    type Pred = Predicate;
    type Decl = ClassDecl;
    type Constraint = TypeEq<Classes>;

    fn value_kind() -> Kind {
        Kind::Data
    }

    fn var(name: Name, kind: &Kind) -> Type {
        Type::Var(name, kind.clone())
    }

    fn arrow(from: Type, to: Type) -> Type {
        Type::fun(from, to)
    }

    fn decompose(step: Step<Self>, left: Type, right: Type) -> Result<InferenceState<Self>> {
        match (left, right) {
            (Type::Con(a, _), Type::Con(b, _)) if a == b => Ok(step.resume([])),
            (Type::App(f1, a1), Type::App(f2, a2)) => Ok(step.resume([
                Entry::constraint(TypeEq::new(*f1, *f2)),
                Entry::constraint(TypeEq::new(*a1, *a2)),
            ])),
            (left, right) => Err(TypeError::mismatch(&left, &right)),
        }
    }

    fn flex_rigid(step: Step<Self>, eq: FlexRigid<Self>) -> Result<InferenceState<Self>> {
        let expected = eq.flex.kind()?;
        let found = eq.rigid.kind()?;
        if expected != found {
            return Err(TypeError::kind_mismatch(&expected, &found));
        }
        machine::walk_flex_rigid(step, eq)
    }

    fn reduce(preds: Vec<Predicate>, ctx: &Context<Self>) -> Result<Vec<Predicate>> {
        reduce(preds, ctx)
    }
}

pub fn infer(initial: InferenceState<Classes>, term: &Term) -> Result<QualifiedType> {
    hm::infer(initial, term)
}

pub fn infer_with(
    initial: InferenceState<Classes>,
    term: &Term,
    options: &Options,
) -> Result<QualifiedType> {
    hm::infer_with(initial, term, options)
}

impl Context<Classes> {
    pub fn find_class(&self, name: Name) -> Option<&ClassDecl> {
        self.decls().find(|decl| decl.name == name)
    }
}

impl InferenceState<Classes> {
    /// Declares a class with no instances.
    pub fn add_class(&self, name: &str) -> Result<Self> {
        let name = ustr(name);
        if self.context.find_class(name).is_some() {
            return Err(TypeError::DuplicateClass(name));
        }
        Ok(self.clone().push(Entry::Decl(ClassDecl::new(name))))
    }

    /// Adds an instance to a declared class.
    ///
    /// The instance is refused if its head unifies with the head of an
    /// existing instance of the class; `self` is left as it was either way.
    pub fn add_instance(&self, class: &str, instance: TypeScheme) -> Result<Self> {
        let class = ustr(class);
        let decl = self
            .context
            .find_class(class)
            .ok_or(TypeError::UnknownClass(class))?;

        let mut fresh = FreshVariableStream::new();
        let mut specialized = Vec::with_capacity(decl.instances.len());
        for existing in &decl.instances {
            let (next, _, body) = existing.instantiate(&fresh, "tc", Classes::var);
            fresh = next;
            specialized.push((existing, body.head));
        }
        let (_, _, candidate) = instance.instantiate(&fresh, "tc", Classes::var);
        if let Some((existing, _)) = specialized
            .iter()
            .find(|(_, head)| head.overlaps(&candidate.head))
        {
            return Err(TypeError::OverlapError {
                candidate: instance.to_string(),
                existing: existing.to_string(),
            });
        }

        let entries = self
            .context
            .iter()
            .map(|entry| match entry {
                Entry::Decl(decl) if decl.name == class => {
                    let mut decl = decl.clone();
                    decl.instances.push(instance.clone());
                    Entry::Decl(decl)
                }
                entry => entry.clone(),
            })
            .collect::<Vec<_>>();
        Ok(InferenceState::new(self.fresh.clone(), entries))
    }
}

/// The subgoals of the first instance whose head matches the predicate.
pub fn instance_subgoals(pred: &Predicate, ctx: &Context<Classes>) -> Result<Option<Vec<Predicate>>> {
    let decl = ctx
        .find_class(pred.class)
        .ok_or(TypeError::UnknownClass(pred.class))?;
    Ok(decl.instances.iter().find_map(|instance| {
        let subst = instance.body.head.match_type(&pred.arg)?;
        Some(
            instance
                .body
                .predicates
                .iter()
                .map(|p| subst.apply(p))
                .collect(),
        )
    }))
}

/// Rewrites a predicate into predicates on type variables.
pub fn to_head_normal_form(pred: &Predicate, ctx: &Context<Classes>) -> Result<Vec<Predicate>> {
    if pred.is_head_normal() {
        return Ok(vec![pred.clone()]);
    }
    match instance_subgoals(pred, ctx)? {
        Some(goals) => {
            let mut out = vec![];
            for goal in &goals {
                out.extend(to_head_normal_form(goal, ctx)?);
            }
            Ok(out)
        }
        None => Err(TypeError::ContextReductionFailed(pred.to_string())),
    }
}

/// Whether `given` together with the instances in scope imply `pred`.
pub fn entails(ctx: &Context<Classes>, given: &[Predicate], pred: &Predicate) -> Result<bool> {
    if given.contains(pred) {
        return Ok(true);
    }
    match instance_subgoals(pred, ctx)? {
        Some(goals) => {
            for goal in &goals {
                if !entails(ctx, given, goal)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Drops, first to last, every predicate implied by the others still around.
pub fn simplify(preds: Vec<Predicate>, ctx: &Context<Classes>) -> Result<Vec<Predicate>> {
    let mut kept: Vec<Predicate> = vec![];
    for (i, pred) in preds.iter().enumerate() {
        let others: Vec<_> = preds[i + 1..].iter().chain(&kept).cloned().collect();
        if !entails(ctx, &others, pred)? {
            kept.push(pred.clone());
        }
    }
    Ok(kept)
}

/// Head-normal form, then simplification.
pub fn reduce(preds: Vec<Predicate>, ctx: &Context<Classes>) -> Result<Vec<Predicate>> {
    let mut normal = vec![];
    for pred in &preds {
        normal.extend(to_head_normal_form(pred, ctx)?);
    }
    simplify(normal, ctx)
}

/// Reduces `preds` and splits off those mentioning a variable outside
/// `generalized`.
pub fn split_predicates(
    preds: Vec<Predicate>,
    ctx: &Context<Classes>,
    generalized: &BTreeSet<Name>,
) -> Result<(Vec<Predicate>, Vec<Predicate>)> {
    hm::split_predicates(preds, ctx, generalized)
}
