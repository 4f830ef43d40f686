pub mod diagnostic;
pub mod report;

pub use diagnostic::*;
pub use report::*;

/// A trait for types that can be converted into a diagnostic.
pub trait IntoDiagnostic {
    fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
    fn into_diagnostic(self) -> Diagnostic {
        self
    }
}
