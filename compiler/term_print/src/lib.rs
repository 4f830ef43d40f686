pub mod ansi;

use ansi::StripAnsi;

use std::convert::Infallible;
use std::io;

pub const TABWIDTH: &str = "  ";

/// Printing with a context and a piece of positional info.
///
/// Type printers use the info as the binding strength of the surrounding
/// position, so that a nested term knows whether it needs parentheses.
pub trait PrettyPrint<Ctx, Info: Clone = usize> {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        info: Info,
    ) -> io::Result<()>;
}

impl<T: PrettyPrint<Ctx, Info>, Ctx, Info: Clone> PrettyPrint<Ctx, Info> for Option<T> {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        info: Info,
    ) -> io::Result<()> {
        if let Some(item) = self {
            item.pretty_print(out, ctx, info)?;
        }
        Ok(())
    }
}

impl<T: PrettyPrint<Ctx, Info>, Ctx, Info: Clone> PrettyPrint<Ctx, Info> for Box<T> {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        info: Info,
    ) -> io::Result<()> {
        (**self).pretty_print(out, ctx, info)
    }
}

impl<T: PrettyPrint<Ctx, Info>, Ctx, Info: Clone> PrettyPrint<Ctx, Info> for &T {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        info: Info,
    ) -> io::Result<()> {
        (**self).pretty_print(out, ctx, info)
    }
}

impl<Ctx, Info: Clone> PrettyPrint<Ctx, Info> for Infallible {
    fn pretty_print<Output: io::Write>(&self, _: &mut Output, _: &Ctx, _: Info) -> io::Result<()> {
        match *self {}
    }
}

//
//

pub trait PrettyString<Ctx, Info: Clone>: PrettyPrint<Ctx, Info> {
    fn pretty_string(&self, ctx: &Ctx) -> String;
    fn plain_string(&self, ctx: &Ctx) -> String;
}

impl<T: PrettyPrint<Ctx, Info>, Ctx, Info: Default + Clone> PrettyString<Ctx, Info> for T {
    fn pretty_string(&self, ctx: &Ctx) -> String {
        let mut buf = Vec::new();
        self.pretty_print(&mut buf, ctx, Info::default()).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn plain_string(&self, ctx: &Ctx) -> String {
        let mut buf = Vec::new();
        self.pretty_print(&mut StripAnsi::new(&mut buf), ctx, Info::default())
            .unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A wrapper for writers that indents the start of newlines with the given indent level.
pub struct IndentWriter<'a, Output: io::Write> {
    out: &'a mut Output,
    level: usize,
    newline: bool,
}

impl<'a, Output: io::Write> IndentWriter<'a, Output> {
    pub fn new(out: &'a mut Output, level: usize) -> Self {
        Self {
            out,
            level,
            newline: true,
        }
    }
}

impl<'a, Output: io::Write> io::Write for IndentWriter<'a, Output> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let tab = TABWIDTH.repeat(self.level);
        for &b in buf {
            if self.newline {
                self.out.write_all(tab.as_bytes())?;
                self.newline = false;
            }
            if b == b'\n' {
                self.newline = true;
            }
            self.out.write_all(&[b])?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

//
// Formatting helpers

pub fn write_list<C, I, O, S, T, Info>(out: &mut O, ctx: &C, sep: S, items: &I) -> io::Result<()>
where
    O: io::Write,
    S: AsRef<str>,
    T: PrettyPrint<C, Info>,
    Info: Clone + Default,
    for<'a> &'a I: IntoIterator<Item = &'a T>,
{
    let mut items = items.into_iter().peekable();
    while let Some(arg) = items.next() {
        arg.pretty_print(out, ctx, Info::default())?;
        if items.peek().is_some() {
            write!(out, "{}", sep.as_ref())?;
        }
    }
    Ok(())
}

pub fn write_delimited_list<C, I, O, S, T, Info>(
    out: &mut O,
    ctx: &C,
    items: &I,
    sep: S,
    l_delim: S,
    r_delim: S,
) -> io::Result<()>
where
    O: io::Write,
    T: PrettyPrint<C, Info>,
    S: AsRef<str>,
    Info: Clone + Default,
    for<'a> &'a I: IntoIterator<Item = &'a T>,
{
    write!(out, "{}", l_delim.as_ref())?;
    write_list(out, ctx, sep, items)?;
    write!(out, "{}", r_delim.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ansi::{KEYWORD, RESET};
    use super::*;

    struct Word(&'static str);

    impl PrettyPrint<()> for Word {
        fn pretty_print<Output: io::Write>(&self, out: &mut Output, _: &(), _: usize) -> io::Result<()> {
            write!(out, "{KEYWORD}{}{RESET}", self.0)
        }
    }

    #[test]
    fn plain_string_strips_colors() {
        let word = Word("let");
        assert_ne!(word.pretty_string(&()), "let");
        assert_eq!(word.plain_string(&()), "let");
    }

    #[test]
    fn delimited_list_wraps_items() {
        let words = vec![Word("x"), Word("y")];
        let mut buf = Vec::new();
        write_delimited_list(&mut StripAnsi::new(&mut buf), &(), &words, " ", "[", "]").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[x y]");
    }

    #[test]
    fn indent_writer_indents_each_line() {
        let mut buf = Vec::new();
        {
            use std::io::Write;
            let mut out = IndentWriter::new(&mut buf, 1);
            write!(out, "one\ntwo").unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "  one\n  two");
    }
}
