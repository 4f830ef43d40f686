//! Types with sequence ("dotted") kinds.
//!
//! A sequence type `[τ1, .., τn | δ...]` stands for a run of types; the
//! optional dotted tail `δ` stands for any number of further types. A
//! variable of kind `Seq(*)` may be replaced by a sequence, which splices
//! into enclosing sequences and distributes applications over its elements.

use crate::{Name, Result, TypeError, P};

use either::Either;
use std::collections::{BTreeMap, BTreeSet};
use ustr::ustr;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Data,
    Arrow(P<Kind>, P<Kind>),
    Seq(P<Kind>),
}

impl Kind {
    pub fn arrow(from: Kind, to: Kind) -> Self {
        Kind::Arrow(P::new(from), P::new(to))
    }

    pub fn seq(of: Kind) -> Self {
        Kind::Seq(P::new(of))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Var(Name, Kind),
    Con(Name, Kind),
    App(P<Type>, P<Type>),
    Seq(Vec<Type>, Option<P<Type>>),
}

pub type Subst = BTreeMap<Name, Type>;

impl Type {
    pub fn var(name: &str, kind: Kind) -> Self {
        Type::Var(ustr(name), kind)
    }

    pub fn con(name: &str, kind: Kind) -> Self {
        Type::Con(ustr(name), kind)
    }

    pub fn app(func: Type, arg: Type) -> Self {
        Type::App(P::new(func), P::new(arg))
    }

    pub fn seq(elems: Vec<Type>) -> Self {
        Type::Seq(elems, None)
    }

    pub fn dotted(elems: Vec<Type>, tail: Type) -> Self {
        Type::Seq(elems, Some(P::new(tail)))
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
                found => Err(TypeError::KindMismatch {
                    expected: "k1 -> k2".to_owned(),
                    found: found.to_string(),
                }),
            },
            Type::Seq(..) => Ok(Kind::seq(Kind::Data)),
        }
    }

    pub fn free_vars(&self) -> BTreeSet<Name> {
        match self {
            Type::Var(x, _) => BTreeSet::from([*x]),
            Type::Con(..) => BTreeSet::new(),
            Type::App(func, arg) => {
                let mut vars = func.free_vars();
                vars.extend(arg.free_vars());
                vars
            }
            Type::Seq(elems, tail) => elems
                .iter()
                .chain(tail.as_deref())
                .flat_map(Type::free_vars)
                .collect(),
        }
    }

    /// How deeply sequence constructors nest at the top of the type.
    pub fn depth(&self) -> usize {
        match self {
            Type::Var(..) | Type::Con(..) | Type::App(..) => 0,
            Type::Seq(elems, tail) => {
                1 + elems
                    .iter()
                    .chain(tail.as_deref())
                    .map(Type::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// The depth of each element of a sequence; empty for other types.
    pub fn levels(&self) -> Vec<usize> {
        match self {
            Type::Seq(elems, _) => elems.iter().map(Type::depth).collect(),
            _ => vec![],
        }
    }

    /// Replaces `name` by `with`, splicing sequences into sequences.
    pub fn subst(&self, name: Name, with: &Type) -> Result<Type> {
        match self {
            Type::Var(x, _) if *x == name => Ok(with.clone()),
            Type::Var(..) | Type::Con(..) => Ok(self.clone()),
            Type::App(func, arg) => {
                let func = func.subst(name, with)?;
                let arg = arg.subst(name, with)?;
                distribute(func, arg)
            }
            Type::Seq(elems, tail) => {
                let mut out = Vec::with_capacity(elems.len());
                for elem in elems {
                    match elem.subst(name, with)? {
                        Type::Seq(inner, None) => out.extend(inner),
                        Type::Seq(_, Some(_)) => {
                            return Err(TypeError::Unsupported(
                                "a dotted sequence spliced before the end of a sequence",
                            ))
                        }
                        elem => out.push(elem),
                    }
                }
                let tail = match tail {
                    None => None,
                    Some(tail) => match tail.subst(name, with)? {
                        Type::Seq(inner, tail) => {
                            out.extend(inner);
                            tail
                        }
                        tail => Some(P::new(tail)),
                    },
                };
                Ok(Type::Seq(out, tail))
            }
        }
    }

    /// One-way matching of a pattern against a type.
    ///
    /// Elements past the pattern's fixed prefix are matched by its dotted
    /// tail; each variable of the tail is bound to the sequence of what it
    /// matched. A dotted tail matched against another dotted tail is not
    /// supported.
    pub fn match_type(&self, other: &Type) -> Result<Option<Subst>> {
        match (self, other) {
            (Type::Var(x, kind), _) => Ok(match other.kind() {
                Ok(found) if found == *kind => Some(BTreeMap::from([(*x, other.clone())])),
                _ => None,
            }),
            (Type::Con(a, _), Type::Con(b, _)) if a == b => Ok(Some(Subst::new())),
            (Type::App(f1, a1), Type::App(f2, a2)) => {
                let Some(left) = f1.match_type(f2)? else {
                    return Ok(None);
                };
                let Some(right) = a1.match_type(a2)? else {
                    return Ok(None);
                };
                Ok(merge(left, right))
            }
            (Type::Seq(pats, pat_tail), Type::Seq(elems, tail)) => {
                match_seq(pats, pat_tail.as_deref(), elems, tail.as_deref())
            }
            _ => Ok(None),
        }
    }
}

fn match_seq(
    pats: &[Type],
    pat_tail: Option<&Type>,
    elems: &[Type],
    tail: Option<&Type>,
) -> Result<Option<Subst>> {
    let fits = match pat_tail {
        None => elems.len() == pats.len() && tail.is_none(),
        Some(_) => elems.len() >= pats.len(),
    };
    if !fits {
        return Ok(None);
    }

    let mut matched = Subst::new();
    for (pat, elem) in pats.iter().zip(elems) {
        let Some(s) = pat.match_type(elem)? else {
            return Ok(None);
        };
        let Some(merged) = merge(matched, s) else {
            return Ok(None);
        };
        matched = merged;
    }

    let Some(pat_tail) = pat_tail else {
        return Ok(Some(matched));
    };
    if tail.is_some() {
        return Err(TypeError::Unsupported(
            "matching a dotted tail against a dotted tail",
        ));
    }

    let seq_vars = pat_tail.free_vars();
    let mut runs: BTreeMap<Name, Vec<Type>> =
        seq_vars.iter().map(|x| (*x, Vec::new())).collect();
    for elem in &elems[pats.len()..] {
        let Some(s) = pat_tail.match_type(elem)? else {
            return Ok(None);
        };
        for (x, t) in s {
            runs.entry(x).or_default().push(t);
        }
    }
    let dotted = runs.into_iter().map(|(x, run)| (x, Type::seq(run))).collect();
    Ok(merge(matched, dotted))
}

/// `f a` where either side may have become a sequence.
fn distribute(func: Type, arg: Type) -> Result<Type> {
    match (func, arg) {
        (Type::Seq(fs, None), Type::Seq(args, None)) => {
            if fs.len() != args.len() {
                return Err(TypeError::KindMismatch {
                    expected: format!("a sequence of {}", fs.len()),
                    found: format!("a sequence of {}", args.len()),
                });
            }
            let apps = fs.into_iter().zip(args).map(|(f, a)| Type::app(f, a));
            Ok(Type::seq(apps.collect()))
        }
        (Type::Seq(fs, None), arg) => {
            Ok(Type::seq(fs.into_iter().map(|f| Type::app(f, arg.clone())).collect()))
        }
        (func, Type::Seq(args, None)) => {
            Ok(Type::seq(args.into_iter().map(|a| Type::app(func.clone(), a)).collect()))
        }
        (func, arg) => Ok(Type::app(func, arg)),
    }
}

fn merge(mut left: Subst, right: Subst) -> Option<Subst> {
    for (x, t) in right {
        match left.get(&x) {
            Some(existing) if *existing != t => return None,
            Some(_) => {}
            None => {
                left.insert(x, t);
            }
        }
    }
    Some(left)
}

/// A class constraint over a possibly sequence-kinded argument.
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

    /// Substitutes into the argument; a predicate over a sequence becomes
    /// one predicate per element.
    pub fn subst(&self, name: Name, with: &Type) -> Result<Either<Predicate, Vec<Predicate>>> {
        Ok(match self.arg.subst(name, with)? {
            Type::Seq(elems, None) => Either::Right(
                elems
                    .into_iter()
                    .map(|arg| Predicate { class: self.class, arg })
                    .collect(),
            ),
            arg => Either::Left(Predicate { class: self.class, arg }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str) -> Type {
        Type::var(name, Kind::Data)
    }

    fn seq_var(name: &str) -> Type {
        Type::var(name, Kind::seq(Kind::Data))
    }

    fn prim(name: &str) -> Type {
        Type::con(name, Kind::Data)
    }

    #[test]
    fn depth_counts_sequence_nesting() {
        assert_eq!(data("x").depth(), 0);
        assert_eq!(Type::seq(vec![Type::seq(vec![])]).depth(), 2);
        let k = Type::con("K", Kind::arrow(Kind::seq(Kind::Data), Kind::Data));
        assert_eq!(Type::seq(vec![Type::app(Type::seq(vec![]), k)]).depth(), 1);
    }

    #[test]
    fn levels_are_element_depths() {
        assert!(data("x").levels().is_empty());
        let ty = Type::seq(vec![Type::seq(vec![data("x")]), data("y")]);
        assert_eq!(ty.levels(), [1, 0]);
    }

    #[test]
    fn sequences_splice_into_sequences() {
        let ty = Type::seq(vec![prim("int"), seq_var("xs"), prim("bool")]);
        let out = ty
            .subst(ustr("xs"), &Type::seq(vec![prim("a"), prim("b")]))
            .unwrap();
        assert_eq!(
            out,
            Type::seq(vec![prim("int"), prim("a"), prim("b"), prim("bool")])
        );
    }

    #[test]
    fn dotted_tail_absorbs_sequences() {
        let ty = Type::dotted(vec![prim("int")], seq_var("xs"));
        let out = ty
            .subst(ustr("xs"), &Type::dotted(vec![prim("a")], seq_var("ys")))
            .unwrap();
        assert_eq!(out, Type::dotted(vec![prim("int"), prim("a")], seq_var("ys")));
    }

    #[test]
    fn applications_distribute_over_sequences() {
        let list = Type::con("[]", Kind::arrow(Kind::Data, Kind::Data));
        let ty = Type::app(list.clone(), seq_var("xs"));
        let out = ty
            .subst(ustr("xs"), &Type::seq(vec![prim("int"), prim("bool")]))
            .unwrap();
        assert_eq!(
            out,
            Type::seq(vec![
                Type::app(list.clone(), prim("int")),
                Type::app(list, prim("bool")),
            ])
        );
    }

    #[test]
    fn mismatched_sequence_lengths_fail() {
        let fs = Type::seq(vec![prim("f")]);
        let ty = Type::app(fs, seq_var("xs"));
        let xs = Type::seq(vec![prim("a"), prim("b")]);
        assert!(matches!(
            ty.subst(ustr("xs"), &xs),
            Err(TypeError::KindMismatch { .. })
        ));
    }

    #[test]
    fn predicates_split_over_sequences() {
        let pred = Predicate::new("Eq", seq_var("xs"));
        let out = pred
            .subst(ustr("xs"), &Type::seq(vec![prim("int"), prim("bool")]))
            .unwrap();
        assert_eq!(
            out,
            Either::Right(vec![
                Predicate::new("Eq", prim("int")),
                Predicate::new("Eq", prim("bool")),
            ])
        );
        let out = pred.subst(ustr("ys"), &prim("int")).unwrap();
        assert_eq!(out, Either::Left(pred.clone()));
    }

    #[test]
    fn dotted_pattern_collects_the_rest() {
        let list = Type::con("[]", Kind::arrow(Kind::Data, Kind::Data));
        let pattern = Type::dotted(vec![data("a")], Type::app(list.clone(), data("b")));
        let target = Type::seq(vec![
            prim("int"),
            Type::app(list.clone(), prim("x")),
            Type::app(list, prim("y")),
        ]);
        let s = pattern.match_type(&target).unwrap().unwrap();
        assert_eq!(s.get(&ustr("a")), Some(&prim("int")));
        assert_eq!(s.get(&ustr("b")), Some(&Type::seq(vec![prim("x"), prim("y")])));
    }

    #[test]
    fn fixed_patterns_need_equal_lengths() {
        let pattern = Type::seq(vec![data("a")]);
        let target = Type::seq(vec![prim("int"), prim("bool")]);
        assert_eq!(pattern.match_type(&target), Ok(None));
    }

    #[test]
    fn dotted_against_dotted_is_unsupported() {
        let pattern = Type::dotted(vec![], data("a"));
        let target = Type::dotted(vec![], data("b"));
        assert!(matches!(
            pattern.match_type(&target),
            Err(TypeError::Unsupported(_))
        ));
    }
}
