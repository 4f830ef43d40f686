use crate::{Name, P};

use std::collections::BTreeSet;
use ustr::ustr;

/// A lambda calculus term with let-polymorphism.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    /// A variable.
    Var(Name),
    /// An abstraction, `λx.e`.
    Lam(Name, P<Term>),
    /// An application, `f a`.
    App(P<Term>, P<Term>),
    /// A let binding, `let x = e1 in e2`.
    Let(Name, P<Term>, P<Term>),
    /// A floating point literal.
    Float(f64),
}

impl Term {
    pub fn var(name: &str) -> Self {
        Term::Var(ustr(name))
    }

    pub fn lam(param: &str, body: Term) -> Self {
        Term::Lam(ustr(param), P::new(body))
    }

    pub fn app(func: Term, arg: Term) -> Self {
        Term::App(P::new(func), P::new(arg))
    }

    /// Applies `func` to each argument in turn.
    pub fn apps(func: Term, args: impl IntoIterator<Item = Term>) -> Self {
        args.into_iter().fold(func, Term::app)
    }

    pub fn let_in(name: &str, bound: Term, body: Term) -> Self {
        Term::Let(ustr(name), P::new(bound), P::new(body))
    }

    pub fn free_vars(&self) -> BTreeSet<Name> {
        match self {
            Term::Var(x) => BTreeSet::from([*x]),
            Term::Lam(x, body) => {
                let mut vars = body.free_vars();
                vars.remove(x);
                vars
            }
            Term::App(f, a) => {
                let mut vars = f.free_vars();
                vars.extend(a.free_vars());
                vars
            }
            Term::Let(x, bound, body) => {
                let mut vars = body.free_vars();
                vars.remove(x);
                vars.extend(bound.free_vars());
                vars
            }
            Term::Float(_) => BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binders_hide_their_variable() {
        let term = Term::lam("x", Term::apps(Term::var("f"), [Term::var("x"), Term::var("y")]));
        assert_eq!(term.free_vars(), BTreeSet::from([ustr("f"), ustr("y")]));
    }

    #[test]
    fn let_binding_scopes_over_body_only() {
        // let x = x in x: the bound term's `x` is free.
        let term = Term::let_in("x", Term::var("x"), Term::var("x"));
        assert_eq!(term.free_vars(), BTreeSet::from([ustr("x")]));

        let term = Term::let_in("x", Term::Float(1.0), Term::var("x"));
        assert!(term.free_vars().is_empty());
    }
}
