use crate::{basic, classes, dots, units};
use crate::{Qualified, Scheme, Term};

use term_print::ansi::{
    chars::{
        ARROW, CARET, COLON, COMMA_SEP, ELLIPSIS, EQUALS, FAT_ARROW, FORALL, LAMBDA, LANGLE,
        LBRAC, LPARN, PERIOD, RANGLE, RBRAC, RPARN, STAR,
    },
    CONST, KEYWORD, PUNCT, RESET, TAG, VAR,
};
use term_print::{write_delimited_list, write_list, PrettyPrint, PrettyString};

use std::fmt;
use std::io;

/// Binding strength of the position being printed into.
const TOP: usize = 0;
/// Left of an arrow, or the function of an application.
const LEFT: usize = 1;
/// Argument of an application, or base of a power.
const ARG: usize = 2;

fn parens<Output: io::Write>(
    out: &mut Output,
    wrap: bool,
    body: impl FnOnce(&mut Output) -> io::Result<()>,
) -> io::Result<()> {
    if wrap {
        write!(out, "{LPARN}")?;
    }
    body(out)?;
    if wrap {
        write!(out, "{RPARN}")?;
    }
    Ok(())
}

impl<Ctx> PrettyPrint<Ctx> for Term {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        match self {
            Term::Var(x) => write!(out, "{}", x),
            Term::Float(value) => write!(out, "{CONST}{}{RESET}", value),
            Term::Lam(x, body) => parens(out, prec >= LEFT, |out| {
                write!(out, "{LAMBDA}{}{PERIOD}", x)?;
                body.pretty_print(out, ctx, TOP)
            }),
            Term::App(func, arg) => parens(out, prec >= ARG, |out| {
                func.pretty_print(out, ctx, LEFT)?;
                write!(out, " ")?;
                arg.pretty_print(out, ctx, ARG)
            }),
            Term::Let(x, bound, body) => parens(out, prec >= LEFT, |out| {
                write!(out, "{KEYWORD}let{RESET} {} {EQUALS} ", x)?;
                bound.pretty_print(out, ctx, TOP)?;
                write!(out, " {KEYWORD}in{RESET} ")?;
                body.pretty_print(out, ctx, TOP)
            }),
        }
    }
}

//
// basic

impl<Ctx> PrettyPrint<Ctx> for basic::Kind {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, _: &Ctx, _: usize) -> io::Result<()> {
        write!(out, "{STAR}")
    }
}

impl<Ctx> PrettyPrint<Ctx> for basic::Type {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        match self {
            basic::Type::Var(x) => write!(out, "{VAR}{}{RESET}", x),
            basic::Type::Arrow(a, b) => parens(out, prec >= LEFT, |out| {
                a.pretty_print(out, ctx, LEFT)?;
                write!(out, " {ARROW} ")?;
                b.pretty_print(out, ctx, TOP)
            }),
        }
    }
}

//
// classes

impl<Ctx> PrettyPrint<Ctx> for classes::Kind {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        match self {
            classes::Kind::Data => write!(out, "{STAR}"),
            classes::Kind::Arrow(a, b) => parens(out, prec >= LEFT, |out| {
                a.pretty_print(out, ctx, LEFT)?;
                write!(out, " {ARROW} ")?;
                b.pretty_print(out, ctx, TOP)
            }),
        }
    }
}

impl<Ctx> PrettyPrint<Ctx> for classes::Type {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        if let Some((from, to)) = self.as_fun() {
            return parens(out, prec >= LEFT, |out| {
                from.pretty_print(out, ctx, LEFT)?;
                write!(out, " {ARROW} ")?;
                to.pretty_print(out, ctx, TOP)
            });
        }
        match self {
            classes::Type::Var(x, _) => write!(out, "{VAR}{}{RESET}", x),
            classes::Type::Con(c, _) => write!(out, "{CONST}{}{RESET}", c),
            classes::Type::App(func, arg) => parens(out, prec >= ARG, |out| {
                func.pretty_print(out, ctx, LEFT)?;
                write!(out, " ")?;
                arg.pretty_print(out, ctx, ARG)
            }),
        }
    }
}

impl<Ctx> PrettyPrint<Ctx> for classes::Predicate {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &Ctx, _: usize) -> io::Result<()> {
        write!(out, "{TAG}{}{RESET} ", self.class)?;
        self.arg.pretty_print(out, ctx, ARG)
    }
}

impl<Ctx> PrettyPrint<Ctx> for classes::ClassDecl {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &Ctx, _: usize) -> io::Result<()> {
        write!(out, "{KEYWORD}class{RESET} {TAG}{}{RESET} ", self.name)?;
        write_delimited_list(out, ctx, &self.instances, COMMA_SEP, LBRAC, RBRAC)
    }
}

//
// units

impl<Ctx> PrettyPrint<Ctx> for units::Kind {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, _: &Ctx, _: usize) -> io::Result<()> {
        match self {
            units::Kind::Value => write!(out, "{STAR}"),
            units::Kind::Unit => write!(out, "{PUNCT}#{RESET}"),
        }
    }
}

impl<Ctx> PrettyPrint<Ctx> for units::Type {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        match self {
            units::Type::Var(x) => write!(out, "{VAR}{}{RESET}", x),
            units::Type::Prim(p) => write!(out, "{CONST}{}{RESET}", p),
            units::Type::UnitIdentity => write!(out, "{CONST}1{RESET}"),
            units::Type::Arrow(a, b) => parens(out, prec >= LEFT, |out| {
                a.pretty_print(out, ctx, LEFT)?;
                write!(out, " {ARROW} ")?;
                b.pretty_print(out, ctx, TOP)
            }),
            units::Type::Float(unit) => {
                write!(out, "{CONST}F{RESET}{LANGLE}")?;
                unit.pretty_print(out, ctx, TOP)?;
                write!(out, "{RANGLE}")
            }
            units::Type::UnitMul(a, b) => parens(out, prec >= ARG, |out| {
                a.pretty_print(out, ctx, LEFT)?;
                write!(out, " ")?;
                b.pretty_print(out, ctx, LEFT)
            }),
            units::Type::UnitPow(base, 1) => base.pretty_print(out, ctx, prec),
            units::Type::UnitPow(base, e) => {
                base.pretty_print(out, ctx, ARG)?;
                write!(out, "{CARET}{}", e)
            }
        }
    }
}

impl<Ctx> PrettyPrint<Ctx> for units::Unit {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        self.to_type().pretty_print(out, ctx, prec)
    }
}

//
// dots

impl<Ctx> PrettyPrint<Ctx> for dots::Kind {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        match self {
            dots::Kind::Data => write!(out, "{STAR}"),
            dots::Kind::Arrow(a, b) => parens(out, prec >= LEFT, |out| {
                a.pretty_print(out, ctx, LEFT)?;
                write!(out, " {ARROW} ")?;
                b.pretty_print(out, ctx, TOP)
            }),
            dots::Kind::Seq(k) => {
                write!(out, "{LBRAC}")?;
                k.pretty_print(out, ctx, TOP)?;
                write!(out, "{RBRAC}")
            }
        }
    }
}

impl<Ctx> PrettyPrint<Ctx> for dots::Type {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        prec: usize,
    ) -> io::Result<()> {
        match self {
            dots::Type::Var(x, _) => write!(out, "{VAR}{}{RESET}", x),
            dots::Type::Con(c, _) => write!(out, "{CONST}{}{RESET}", c),
            dots::Type::App(func, arg) => parens(out, prec >= ARG, |out| {
                func.pretty_print(out, ctx, LEFT)?;
                write!(out, " ")?;
                arg.pretty_print(out, ctx, ARG)
            }),
            dots::Type::Seq(elems, tail) => {
                write!(out, "{LBRAC}")?;
                write_list(out, ctx, COMMA_SEP, elems)?;
                if let Some(tail) = tail {
                    if !elems.is_empty() {
                        write!(out, "{COMMA_SEP}")?;
                    }
                    tail.pretty_print(out, ctx, ARG)?;
                    write!(out, "{ELLIPSIS}")?;
                }
                write!(out, "{RBRAC}")
            }
        }
    }
}

impl<Ctx> PrettyPrint<Ctx> for dots::Predicate {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &Ctx, _: usize) -> io::Result<()> {
        write!(out, "{TAG}{}{RESET} ", self.class)?;
        self.arg.pretty_print(out, ctx, ARG)
    }
}

//
// schemes

impl<Ctx, T: PrettyPrint<Ctx>, P: PrettyPrint<Ctx>> PrettyPrint<Ctx> for Qualified<T, P> {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &Ctx, _: usize) -> io::Result<()> {
        match self.predicates.as_slice() {
            [] => {}
            [pred] => {
                pred.pretty_print(out, ctx, TOP)?;
                write!(out, " {FAT_ARROW} ")?;
            }
            _ => {
                write_delimited_list(out, ctx, &self.predicates, COMMA_SEP, LPARN, RPARN)?;
                write!(out, " {FAT_ARROW} ")?;
            }
        }
        self.head.pretty_print(out, ctx, TOP)
    }
}

impl<Ctx, T, K, P> PrettyPrint<Ctx> for Scheme<T, K, P>
where
    T: PrettyPrint<Ctx>,
    K: PrettyPrint<Ctx>,
    P: PrettyPrint<Ctx>,
{
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &Ctx, _: usize) -> io::Result<()> {
        if !self.is_mono() {
            write!(out, "{FORALL}")?;
            for (i, (name, kind)) in self.quantified.iter().enumerate() {
                if i > 0 {
                    write!(out, " ")?;
                }
                write!(out, "{VAR}{}{RESET}{COLON}", name)?;
                kind.pretty_print(out, ctx, ARG)?;
            }
            write!(out, "{PERIOD} ")?;
        }
        self.body.pretty_print(out, ctx, TOP)
    }
}

//
// Display

macro_rules! display_via_pretty_print {
    ($($ty:ty),* $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.plain_string(&()))
            }
        }
    )*};
}

display_via_pretty_print!(
    Term,
    basic::Kind,
    basic::Type,
    classes::Kind,
    classes::Type,
    classes::Predicate,
    classes::ClassDecl,
    units::Kind,
    units::Type,
    units::Unit,
    dots::Kind,
    dots::Type,
    dots::Predicate,
);

impl<T: PrettyPrint<()>, P: PrettyPrint<()>> fmt::Display for Qualified<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_string(&()))
    }
}

impl<T: PrettyPrint<()>, K: PrettyPrint<()>, P: PrettyPrint<()>> fmt::Display for Scheme<T, K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_string(&()))
    }
}
