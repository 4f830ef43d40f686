use crate::{Diagnostic, IntoDiagnostic};
use term_print::ansi::{BOLD, GREEN, RED, RESET, StripAnsi};

use std::io;

/// A report is collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// The diagnostics that were attached to this report.
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn render<Output: io::Write>(&self, out: &mut Output) -> io::Result<()> {
        match self.diagnostics.len() {
            0 => writeln!(out, "{BOLD}{GREEN}Ok{RESET}")?,
            nerrs => writeln!(out, "{BOLD}{RED}{} error(s){RESET}", nerrs)?,
        }

        for diagnostic in self.diagnostics.iter() {
            diagnostic.render(out)?;
        }
        Ok(())
    }

    /// Renders the report without colors.
    pub fn plain_string(&self) -> String {
        let mut buf = Vec::new();
        self.render(&mut StripAnsi::new(&mut buf)).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<T: IntoDiagnostic> From<T> for Report {
    fn from(value: T) -> Self {
        Self {
            diagnostics: vec![value.into_diagnostic()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_ok() {
        assert_eq!(Report::default().plain_string(), "Ok\n");
    }

    #[test]
    fn counts_errors() {
        let report = Report::from(Diagnostic::error("one").with_note("two"));
        assert!(!report.is_empty());
        assert_eq!(report.plain_string(), "1 error(s)\nerror: one\n  = note: two\n");
    }
}
