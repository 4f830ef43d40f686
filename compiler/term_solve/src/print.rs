use crate::machine::{FlexRigid, TypeEq};
use crate::units::{Constraint, UnitEq};
use crate::{Context, Entry, InferenceState, Language};

use term_print::ansi::{
    chars::{COLON, COMMA_SEP, DEFINE, EQ_EQ, LBRAC, MARKER, PIPE_SEP, RBRAC},
    KEYWORD, RESET, TAG, VAR,
};
use term_print::{write_list, PrettyPrint};

use std::io;

fn write_deps<L: Language, Output: io::Write>(
    out: &mut Output,
    deps: &[(term_core::Name, L::Kind)],
) -> io::Result<()> {
    if deps.is_empty() {
        return Ok(());
    }
    for (i, (name, kind)) in deps.iter().enumerate() {
        if i > 0 {
            write!(out, "{COMMA_SEP}")?;
        }
        write!(out, "{VAR}{}{RESET}{COLON}", name)?;
        kind.pretty_print(out, &(), 0)?;
    }
    write!(out, "{PIPE_SEP}")
}

impl<L: Language> PrettyPrint<()> for Entry<L> {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &(), _: usize) -> io::Result<()> {
        match self {
            Entry::Intro(name, kind) => {
                write!(out, "{VAR}{}{RESET} {COLON} ", name)?;
                kind.pretty_print(out, ctx, 0)
            }
            Entry::Def(name, def, kind) => {
                write!(out, "{VAR}{}{RESET} {DEFINE} ", name)?;
                def.pretty_print(out, ctx, 0)?;
                write!(out, " {COLON} ")?;
                kind.pretty_print(out, ctx, 0)
            }
            Entry::Bind(name, scheme) => {
                write!(out, "{KEYWORD}{}{RESET} {COLON} ", name)?;
                scheme.pretty_print(out, ctx, 0)
            }
            Entry::Marker => write!(out, "{MARKER}"),
            Entry::Decl(decl) => decl.pretty_print(out, ctx, 0),
            Entry::Constraint(c) => c.pretty_print(out, ctx, 0),
        }
    }
}

impl<L: Language> PrettyPrint<()> for TypeEq<L> {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &(), _: usize) -> io::Result<()> {
        write!(out, "{LBRAC}")?;
        write_deps::<L, _>(out, &self.deps)?;
        self.left.pretty_print(out, ctx, 0)?;
        write!(out, " {EQ_EQ} ")?;
        self.right.pretty_print(out, ctx, 0)?;
        write!(out, "{RBRAC}")
    }
}

impl<L: Language> PrettyPrint<()> for FlexRigid<L> {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &(), _: usize) -> io::Result<()> {
        write!(out, "{LBRAC}")?;
        write_deps::<L, _>(out, &self.deps)?;
        self.flex.pretty_print(out, ctx, 0)?;
        write!(out, " {EQ_EQ} {TAG}hull{RESET} ")?;
        self.rigid.pretty_print(out, ctx, 0)?;
        write!(out, "{RBRAC}")
    }
}

impl PrettyPrint<()> for UnitEq {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &(), _: usize) -> io::Result<()> {
        write!(out, "{LBRAC}")?;
        write_deps::<crate::units::Units, _>(out, &self.deps)?;
        self.equation.pretty_print(out, ctx, 0)?;
        write!(out, " {EQ_EQ} 1{RBRAC}")
    }
}

impl PrettyPrint<()> for Constraint {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &(), _: usize) -> io::Result<()> {
        match self {
            Constraint::Eq(eq) => eq.pretty_print(out, ctx, 0),
            Constraint::Hull(eq) => eq.pretty_print(out, ctx, 0),
            Constraint::Unit(eq) => eq.pretty_print(out, ctx, 0),
        }
    }
}

impl<L: Language> PrettyPrint<()> for Context<L> {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &(), _: usize) -> io::Result<()> {
        write_list(out, ctx, COMMA_SEP, &self.to_vec())
    }
}

impl<L: Language> PrettyPrint<()> for InferenceState<L> {
    fn pretty_print<Output: io::Write>(&self, out: &mut Output, ctx: &(), _: usize) -> io::Result<()> {
        self.context.pretty_print(out, ctx, 0)
    }
}
