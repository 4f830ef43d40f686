use term_core::basic::Type;
use term_core::{Term, TypeError};
use term_solve::basic::{self, Basic};
use term_solve::{Entry, InferenceState, Options, TypeEq};

use ustr::ustr;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn infer(term: &Term) -> Result<Type, TypeError> {
    init_tracing();
    basic::infer(InferenceState::default(), term)
}

fn v(name: &str) -> Type {
    Type::var(name)
}

fn id() -> Term {
    Term::lam("a", Term::var("a"))
}

#[test]
fn identity() {
    let ty = infer(&Term::lam("x", Term::var("x"))).unwrap();
    assert_eq!(ty, Type::arrow(v("t0"), v("t0")));
    assert_eq!(ty.to_string(), "t0 -> t0");
}

#[test]
fn constant_functions() {
    let second = Term::lam("x", Term::lam("y", Term::var("y")));
    assert_eq!(infer(&second).unwrap(), Type::arrows([v("t0"), v("t1")], v("t1")));

    let first = Term::lam("x", Term::lam("y", Term::var("x")));
    assert_eq!(infer(&first).unwrap(), Type::arrows([v("t0"), v("t1")], v("t0")));
}

#[test]
fn applications() {
    let term = Term::lam("x", Term::app(id(), Term::var("x")));
    assert_eq!(infer(&term).unwrap(), Type::arrow(v("t0"), v("t0")));

    let term = Term::lam("x", Term::app(Term::lam("y", Term::var("x")), Term::var("x")));
    assert_eq!(infer(&term).unwrap(), Type::arrow(v("t0"), v("t0")));

    let term = Term::lam("x", Term::lam("y", Term::app(Term::var("x"), Term::var("y"))));
    assert_eq!(
        infer(&term).unwrap(),
        Type::arrows([Type::arrow(v("t1"), v("t2")), v("t1")], v("t2"))
    );
}

#[test]
fn let_polymorphism() {
    let m = Term::let_in("m", id(), Term::app(Term::var("m"), Term::var("m")));
    assert_eq!(infer(&m).unwrap(), Type::arrow(v("t2"), v("t2")));

    let s = Term::let_in("s", m, Term::var("s"));
    assert_eq!(infer(&s).unwrap(), Type::arrow(v("t4"), v("t4")));
}

#[test]
fn self_application_is_infinite() {
    let term = Term::lam("x", Term::app(Term::var("x"), Term::var("x")));
    assert!(matches!(infer(&term), Err(TypeError::OccursCheckFailed { .. })));
}

#[test]
fn unbound_variable() {
    let err = infer(&Term::var("nope")).unwrap_err();
    assert_eq!(err, TypeError::UnboundVariable(ustr("nope")));
}

#[test]
fn literals_are_not_typed() {
    assert!(matches!(
        infer(&Term::Float(1.5)),
        Err(TypeError::UnsupportedTerm(_))
    ));
}

#[test]
fn bindings_from_the_initial_context() {
    init_tracing();
    let scheme = term_core::basic::Scheme::poly(
        vec![(ustr("a"), term_core::basic::Kind)],
        Type::arrow(v("a"), v("a")),
    );
    let state = InferenceState::default().with_binding("id", scheme);
    let term = Term::app(Term::var("id"), Term::var("id"));
    assert_eq!(basic::infer(state, &term).unwrap(), Type::arrow(v("t1"), v("t1")));
}

#[test]
fn tracing_gives_the_same_result() {
    init_tracing();
    let term = Term::let_in("m", id(), Term::app(Term::var("m"), Term::var("m")));
    let plain = basic::infer(InferenceState::default(), &term).unwrap();
    let traced = basic::infer_with(InferenceState::default(), &term, &Options::tracing()).unwrap();
    assert_eq!(plain, traced);
}

#[test]
fn inner_lambda_shadows_outer() {
    let term = Term::lam("x", Term::lam("x", Term::var("x")));
    assert_eq!(infer(&term).unwrap(), Type::arrows([v("t0"), v("t1")], v("t1")));
}

#[test]
fn let_shadows_lambda() {
    let term = Term::lam("x", Term::let_in("x", id(), Term::var("x")));
    assert_eq!(
        infer(&term).unwrap(),
        Type::arrow(v("t0"), Type::arrow(v("t2"), v("t2")))
    );
}

#[test]
fn shadowing_ends_with_the_let() {
    let inner = Term::let_in("x", id(), Term::var("x"));
    let term = Term::lam("x", Term::app(inner, Term::var("x")));
    assert_eq!(infer(&term).unwrap(), Type::arrow(v("t0"), v("t0")));
}

#[test]
fn solved_contexts_are_left_alone() {
    let state: InferenceState<Basic> = InferenceState::default()
        .push(Entry::Intro(ustr("a"), term_core::basic::Kind))
        .push(Entry::Def(ustr("b"), v("a"), term_core::basic::Kind));
    assert!(!state.can_step());
    assert_eq!(state.clone().unify().unwrap(), state);
    assert_eq!(state.clone().step().unwrap(), state);
}

#[test]
fn var_var_defines_the_later_variable() {
    let state: InferenceState<Basic> = InferenceState::default()
        .push(Entry::Intro(ustr("a"), term_core::basic::Kind))
        .push(Entry::Intro(ustr("b"), term_core::basic::Kind))
        .push(Entry::constraint(TypeEq::new(v("a"), v("b"))));
    let (solved, states) = state.unify_traced().unwrap();
    assert_eq!(
        solved.context.to_vec(),
        vec![
            Entry::Intro(ustr("a"), term_core::basic::Kind),
            Entry::Def(ustr("b"), v("a"), term_core::basic::Kind),
        ]
    );
    assert_eq!(states.last(), Some(&solved));
}

#[test]
fn constraint_on_an_unknown_variable() {
    let state: InferenceState<Basic> = InferenceState::default()
        .push(Entry::constraint(TypeEq::new(v("a"), Type::arrow(v("b"), v("b")))));
    let err = state.unify().unwrap_err();
    assert!(err.is_internal());
}
