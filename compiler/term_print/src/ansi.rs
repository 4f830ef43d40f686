use const_format::concatcp;
use std::io::Write;

pub const RED: &str = "\x1B[31m";
pub const GREEN: &str = "\x1B[32m";
pub const BLUE: &str = "\x1B[34m";
pub const MAGENTA: &str = "\x1B[35m";
pub const CYAN: &str = "\x1B[36m";
pub const BOLD: &str = "\x1B[1m";
pub const ITALIC: &str = "\x1B[3m";
pub const RESET: &str = "\x1B[0m";

pub const TAG: &str = concatcp!(BLUE, BOLD);
pub const PUNCT: &str = concatcp!(CYAN);
pub const DELIM: &str = concatcp!(CYAN);
pub const KEYWORD: &str = concatcp!(GREEN);
/// Type constructors and primitive units.
pub const CONST: &str = concatcp!(BLUE);
/// Type variables.
pub const VAR: &str = concatcp!(MAGENTA, ITALIC);

pub mod chars {
    use super::*;
    pub const LBRAC: &str = concatcp!(DELIM, "[", RESET);
    pub const RBRAC: &str = concatcp!(DELIM, "]", RESET);
    pub const LPARN: &str = concatcp!(DELIM, "(", RESET);
    pub const RPARN: &str = concatcp!(DELIM, ")", RESET);
    pub const LANGLE: &str = concatcp!(DELIM, "<", RESET);
    pub const RANGLE: &str = concatcp!(DELIM, ">", RESET);

    pub const EQUALS: &str = concatcp!(PUNCT, "=", RESET);
    pub const DEFINE: &str = concatcp!(PUNCT, ":=", RESET);
    pub const EQ_EQ: &str = concatcp!(PUNCT, "==", RESET);
    pub const PERIOD: &str = concatcp!(PUNCT, ".", RESET);
    pub const COLON: &str = concatcp!(PUNCT, ":", RESET);
    pub const LAMBDA: &str = concatcp!(PUNCT, "λ", RESET);
    pub const FORALL: &str = concatcp!(PUNCT, "∀", RESET);
    pub const ARROW: &str = concatcp!(PUNCT, "->", RESET);
    pub const FAT_ARROW: &str = concatcp!(PUNCT, "=>", RESET);
    pub const STAR: &str = concatcp!(PUNCT, "*", RESET);
    pub const CARET: &str = concatcp!(PUNCT, "^", RESET);
    pub const ELLIPSIS: &str = concatcp!(PUNCT, "...", RESET);
    pub const MARKER: &str = concatcp!(PUNCT, ";;", RESET);
    pub const COMMA: &str = concatcp!(PUNCT, ",", RESET);
    pub const PIPE: &str = concatcp!(DELIM, "|", RESET);

    pub const COMMA_SEP: &str = concatcp!(COMMA, " ");
    pub const PIPE_SEP: &str = concatcp!(" ", PIPE, " ");
}

/// A wrapper for writers that strips ANSI escape codes.
///
/// An escape sequence may be split across `write` calls; the writer remembers
/// that it is inside one until the terminating `m`.
pub struct StripAnsi<'a, W: Write + ?Sized> {
    writer: &'a mut W,
    in_escape: bool,
}

impl<'a, W: Write + ?Sized> StripAnsi<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            in_escape: false,
        }
    }
}

impl<'a, W: Write + ?Sized> Write for StripAnsi<'a, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut start = 0;
        for (i, &b) in buf.iter().enumerate() {
            if self.in_escape {
                if b == b'm' {
                    self.in_escape = false;
                    start = i + 1;
                }
            } else if b == b'\x1B' {
                self.writer.write_all(&buf[start..i])?;
                self.in_escape = true;
            }
        }
        if !self.in_escape && start < buf.len() {
            self.writer.write_all(&buf[start..])?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
