//! The inference driver.
//!
//! Walks the term, pushing intros and bindings onto the context and solving
//! an equation at every application. A `let` generalizes over whatever its
//! bound term introduced after the locality marker.

use crate::{debug_println, Context, Entry, InferenceState, Language, Options, QualifiedOf};
use crate::{SchemeOf, TypeEq};
use term_core::{HasVariables, Name, Qualified, Result, Scheme, Substitute, Term, TypeError};
use term_print::{PrettyString, TABWIDTH};

use std::collections::BTreeSet;

/// An entry taken off the context when generalizing, top first.
type Skimmed<L> = (Name, <L as Language>::Kind, Option<<L as Language>::Type>);

/// Infers the type of `term` in the given initial state.
pub fn infer<L: Language>(initial: InferenceState<L>, term: &Term) -> Result<QualifiedOf<L>> {
    infer_with(initial, term, &Options::normal())
}

pub fn infer_with<L: Language>(
    initial: InferenceState<L>,
    term: &Term,
    options: &Options,
) -> Result<QualifiedOf<L>> {
    let (state, result) = algorithm(initial, term, options, 0)?;
    let context = state.context.normalize();
    debug_println!("final context: {}", context.plain_string(&()));

    let head = L::finish(context.apply(&result.head))?;
    let predicates = L::reduce(context.apply(&result.predicates), &context)?;
    Ok(Qualified::new(predicates, head))
}

fn algorithm<L: Language>(
    state: InferenceState<L>,
    term: &Term,
    options: &Options,
    level: usize,
) -> Result<(InferenceState<L>, QualifiedOf<L>)> {
    let tab = TABWIDTH.repeat(level);
    match term {
        Term::Var(x) => {
            debug_println!("{tab}[var] solving: {}", x);
            let scheme = state
                .context
                .lookup(*x)
                .ok_or(TypeError::UnboundVariable(*x))?;
            let (fresh, vars, result) = scheme.instantiate(&state.fresh, "t", L::var);
            let state = InferenceState {
                fresh,
                context: state.context,
            };
            let state = vars
                .into_iter()
                .fold(state, |state, (name, kind)| state.push(Entry::Intro(name, kind)));
            debug_println!("{tab}[var] done: {} : {}", x, result.plain_string(&()));
            Ok((state, result))
        }
        Term::Lam(x, body) => {
            debug_println!("{tab}[lam] solving: {}", term.plain_string(&()));
            let kind = L::value_kind();
            let (state, a) = state.fresh_var("t");
            let param = L::var(a, &kind);
            let state = state
                .push(Entry::Intro(a, kind))
                .push(Entry::Bind(*x, Scheme::mono(param.clone())));

            let (mut state, body) = algorithm(state, body, options, level + 1)?;
            state.context.remove_binding(*x)?;

            let result = Qualified::new(body.predicates, L::arrow(param, body.head));
            debug_println!("{tab}[lam] done: {}", result.plain_string(&()));
            Ok((state, result))
        }
        Term::App(func, arg) => {
            debug_println!("{tab}[app] solving: {}", term.plain_string(&()));
            let (state, f) = algorithm(state, func, options, level + 1)?;
            let (state, a) = algorithm(state, arg, options, level + 1)?;

            let kind = L::value_kind();
            let (state, r) = state.fresh_var("t");
            let ret = L::var(r, &kind);
            let eq = TypeEq::new(f.head, L::arrow(a.head, ret.clone()));
            let state = state
                .push(Entry::Intro(r, kind))
                .push(Entry::constraint(eq))
                .unify_with(options)?;

            let mut predicates = f.predicates;
            predicates.extend(a.predicates);
            let result = Qualified::new(predicates, ret);
            debug_println!("{tab}[app] done: {}", result.plain_string(&()));
            Ok((state, result))
        }
        Term::Let(x, bound, body) => {
            debug_println!("{tab}[let] solving: {} = {}", x, bound.plain_string(&()));
            let state = state.push(Entry::Marker);
            let (state, bound) = algorithm(state, bound, options, level + 1)?;
            let (state, skimmed) = skim(state)?;

            let (scheme, deferred) = generalize::<L>(&state.context, skimmed, bound)?;
            debug_println!("{tab}[let] generalized: {} : {}", x, scheme.plain_string(&()));

            let state = state.push(Entry::Bind(*x, scheme));
            let (mut state, body) = algorithm(state, body, options, level + 1)?;
            state.context.remove_binding(*x)?;

            let mut predicates = deferred;
            predicates.extend(body.predicates);
            let result = Qualified::new(predicates, body.head);
            debug_println!("{tab}[let] done: {}", result.plain_string(&()));
            Ok((state, result))
        }
        Term::Float(value) => {
            let (state, ty) = L::literal(state, *value)?;
            Ok((state, Qualified::unqualified(ty)))
        }
    }
}

/// Takes intros and definitions off the context down to the locality marker.
fn skim<L: Language>(state: InferenceState<L>) -> Result<(InferenceState<L>, Vec<Skimmed<L>>)> {
    let InferenceState { fresh, context } = state;
    let mut entries = context.into_entries();
    let mut skimmed = vec![];
    loop {
        match entries.pop() {
            Some(Entry::Marker) => break,
            Some(Entry::Intro(name, kind)) => skimmed.push((name, kind, None)),
            Some(Entry::Def(name, def, kind)) => skimmed.push((name, kind, Some(def))),
            Some(_) => {
                return Err(TypeError::malformed(
                    "only intros and definitions may follow a locality marker",
                ))
            }
            None => return Err(TypeError::malformed("missing locality marker")),
        }
    }
    Ok((InferenceState::new(fresh, entries), skimmed))
}

/// Builds the scheme of a let-bound term from what was skimmed.
///
/// Definitions are substituted, intros become the quantified variables.
/// Predicates that mention a variable from outside the `let` are deferred
/// to the enclosing term.
fn generalize<L: Language>(
    context: &Context<L>,
    skimmed: Vec<Skimmed<L>>,
    bound: QualifiedOf<L>,
) -> Result<(SchemeOf<L>, Vec<L::Pred>)> {
    let mut body = bound;
    let mut quantified = vec![];
    for (name, kind, def) in skimmed {
        match def {
            Some(def) => body = body.subst(name, &def),
            None => quantified.push((name, kind)),
        }
    }
    quantified.reverse();

    let generalized = quantified.iter().map(|(name, _)| *name).collect();
    let (deferred, retained) = split_predicates(body.predicates, context, &generalized)?;
    let scheme = Scheme::new(quantified, Qualified::new(retained, body.head));
    Ok((scheme, deferred))
}

/// Reduces `preds`, then splits them into those mentioning a variable
/// outside `generalized` (deferred, first) and the rest.
pub fn split_predicates<L: Language>(
    preds: Vec<L::Pred>,
    context: &Context<L>,
    generalized: &BTreeSet<Name>,
) -> Result<(Vec<L::Pred>, Vec<L::Pred>)> {
    let reduced = L::reduce(preds, context)?;
    Ok(reduced
        .into_iter()
        .partition(|pred| !pred.free_vars().is_subset(generalized)))
}
