use term_core::classes::{Kind, Predicate, QualifiedType, Type, TypeScheme};
use term_core::{Qualified, Term, TypeError};
use term_solve::classes::{self, Classes};
use term_solve::{Entry, InferenceState, TypeEq};

use ustr::ustr;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn a() -> Type {
    Type::var("a", Kind::Data)
}

fn list(elem: Type) -> Type {
    Type::app(Type::con("[]", Kind::constructor(1)), elem)
}

fn int() -> Type {
    Type::prim("int")
}

fn boolean() -> Type {
    Type::prim("bool")
}

fn forall_a(predicates: Vec<Predicate>, head: Type) -> TypeScheme {
    TypeScheme::new(vec![(ustr("a"), Kind::Data)], Qualified::new(predicates, head))
}

/// `Eq` with instances for `int` and for lists of `Eq` types.
fn prelude() -> InferenceState<Classes> {
    init_tracing();
    InferenceState::default()
        .add_class("Eq")
        .and_then(|s| s.add_instance("Eq", TypeScheme::mono(int())))
        .and_then(|s| {
            s.add_instance(
                "Eq",
                forall_a(vec![Predicate::new("Eq", a())], list(a())),
            )
        })
        .unwrap()
        .with_binding(
            "eq",
            forall_a(
                vec![Predicate::new("Eq", a())],
                Type::funs([a(), a()], boolean()),
            ),
        )
        .with_binding("wrap", forall_a(vec![], Type::fun(a(), list(a()))))
        .with_binding("zero", TypeScheme::mono(int()))
        .with_binding("true", TypeScheme::mono(boolean()))
}

fn infer(term: &Term) -> Result<QualifiedType, TypeError> {
    classes::infer(prelude(), term)
}

fn instance_count(state: &InferenceState<Classes>) -> usize {
    state
        .context
        .find_class(ustr("Eq"))
        .map_or(0, |decl| decl.instances.len())
}

#[test]
fn method_keeps_its_predicate() {
    let ty = infer(&Term::var("eq")).unwrap();
    assert_eq!(ty.to_string(), "Eq t0 => t0 -> t0 -> bool");
}

#[test]
fn instance_discharges_the_predicate() {
    let ty = infer(&Term::app(Term::var("eq"), Term::var("zero"))).unwrap();
    assert!(ty.predicates.is_empty());
    assert_eq!(ty.head, Type::fun(int(), boolean()));
    assert_eq!(ty.to_string(), "int -> bool");
}

#[test]
fn missing_instance() {
    let err = infer(&Term::app(Term::var("eq"), Term::var("true"))).unwrap_err();
    assert!(matches!(err, TypeError::ContextReductionFailed(ref p) if p == "Eq bool"));
}

#[test]
fn instance_context_reduces_to_head_normal_form() {
    let term = Term::lam(
        "x",
        Term::app(Term::var("eq"), Term::app(Term::var("wrap"), Term::var("x"))),
    );
    let ty = infer(&term).unwrap();
    let t0 = Type::var("t0", Kind::Data);
    assert_eq!(ty.predicates, vec![Predicate::new("Eq", t0.clone())]);
    assert_eq!(ty.head, Type::funs([t0.clone(), list(t0)], boolean()));
}

#[test]
fn let_bound_method_is_polymorphic() {
    let term = Term::let_in(
        "same",
        Term::lam("y", Term::apps(Term::var("eq"), [Term::var("y"), Term::var("y")])),
        Term::app(Term::var("same"), Term::var("zero")),
    );
    let ty = infer(&term).unwrap();
    assert!(ty.predicates.is_empty());
    assert_eq!(ty.head, boolean());
}

#[test]
fn predicates_on_outer_variables_are_deferred() {
    let term = Term::lam(
        "x",
        Term::let_in(
            "g",
            Term::lam("y", Term::apps(Term::var("eq"), [Term::var("x"), Term::var("y")])),
            Term::var("g"),
        ),
    );
    let ty = infer(&term).unwrap();
    let (param, rest) = ty.head.as_fun().unwrap();
    assert_eq!(ty.predicates, vec![Predicate::new("Eq", param.clone())]);
    assert_eq!(rest, &Type::fun(param.clone(), boolean()));
}

#[test]
fn rigid_mismatch() {
    let err = infer(&Term::app(Term::var("zero"), Term::var("true"))).unwrap_err();
    assert!(matches!(err, TypeError::RigidRigidMismatch { .. }));
}

#[test]
fn kinds_must_agree() {
    let state = InferenceState::<Classes>::default()
        .push(Entry::Intro(ustr("a"), Kind::Data))
        .push(Entry::constraint(TypeEq::new(
            a(),
            Type::con("[]", Kind::constructor(1)),
        )));
    assert!(matches!(state.unify(), Err(TypeError::KindMismatch { .. })));
}

#[test]
fn overlapping_instances_are_refused() {
    let state = prelude();
    let before = instance_count(&state);
    assert_eq!(before, 2);

    let err = state
        .add_instance("Eq", TypeScheme::mono(list(int())))
        .unwrap_err();
    assert!(matches!(err, TypeError::OverlapError { .. }));

    let err = state
        .add_instance("Eq", TypeScheme::mono(int()))
        .unwrap_err();
    assert!(matches!(err, TypeError::OverlapError { .. }));
    assert_eq!(instance_count(&state), before);

    let state = state
        .add_instance("Eq", TypeScheme::mono(boolean()))
        .unwrap();
    assert_eq!(instance_count(&state), before + 1);
    assert!(infer_in(state, &Term::app(Term::var("eq"), Term::var("true"))).is_ok());
}

fn infer_in(state: InferenceState<Classes>, term: &Term) -> Result<QualifiedType, TypeError> {
    classes::infer(state, term)
}

#[test]
fn classes_are_declared_once() {
    let state = prelude();
    assert_eq!(
        state.add_class("Eq").unwrap_err(),
        TypeError::DuplicateClass(ustr("Eq"))
    );
    assert_eq!(
        state
            .add_instance("Show", TypeScheme::mono(int()))
            .unwrap_err(),
        TypeError::UnknownClass(ustr("Show"))
    );
}

#[test]
fn entailment_by_instance() {
    let state = prelude();
    let t = Type::var("t", Kind::Data);
    let given = [Predicate::new("Eq", t.clone())];
    assert!(classes::entails(&state.context, &given, &Predicate::new("Eq", list(t.clone()))).unwrap());
    assert!(classes::entails(&state.context, &[], &Predicate::new("Eq", list(int()))).unwrap());
    assert!(!classes::entails(&state.context, &[], &Predicate::new("Eq", t)).unwrap());
}

#[test]
fn simplify_drops_implied_predicates() {
    let state = prelude();
    let t = Type::var("t", Kind::Data);
    let preds = vec![
        Predicate::new("Eq", list(t.clone())),
        Predicate::new("Eq", t.clone()),
    ];
    assert_eq!(
        classes::simplify(preds.clone(), &state.context).unwrap(),
        vec![Predicate::new("Eq", t.clone())]
    );
    assert_eq!(
        classes::reduce(preds, &state.context).unwrap(),
        vec![Predicate::new("Eq", t)]
    );
}
