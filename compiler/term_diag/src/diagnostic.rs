use term_print::ansi::{BLUE, BOLD, RED, RESET};
use term_print::IndentWriter;

use std::io::{self, Write};

/// An error diagnostic.
///
/// Inference works on terms built in memory, so a diagnostic carries no
/// source location: only the message and any number of trailing notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error<S: ToString>(message: S) -> Self {
        Self {
            message: message.to_string(),
            notes: Vec::new(),
        }
    }

    pub fn with_note<S: ToString>(mut self, message: S) -> Self {
        self.notes.push(message.to_string());
        self
    }

    /// Renders the diagnostic to the output stream.
    pub fn render<Output: io::Write>(&self, out: &mut Output) -> io::Result<()> {
        writeln!(out, "{BOLD}{RED}error{RESET}: {}", self.message)?;

        let mut out = IndentWriter::new(out, 1);
        for note in &self.notes {
            writeln!(out, "{BLUE}={RESET} note: {}", note)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use term_print::ansi::StripAnsi;

    fn plain(d: &Diagnostic) -> String {
        let mut buf = Vec::new();
        d.render(&mut StripAnsi::new(&mut buf)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn renders_message_and_notes() {
        let d = Diagnostic::error("cannot unify `int` with `bool`").with_note("in `eq true`");
        assert_eq!(
            plain(&d),
            "error: cannot unify `int` with `bool`\n  = note: in `eq true`\n"
        );
    }
}
