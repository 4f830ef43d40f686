use crate::Name;
use term_diag::{Diagnostic, IntoDiagnostic};

use std::fmt;
use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, TypeError>;

/// Everything that can make inference fail.
///
/// Types are rendered into the error when it is raised, so errors from all
/// of the languages share one type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unbound variable `{0}`")]
    UnboundVariable(Name),
    #[error("cannot unify `{left}` with `{right}`")]
    RigidRigidMismatch { left: String, right: String },
    #[error("occurs check failed: `{var}` occurs in `{ty}`")]
    OccursCheckFailed { var: Name, ty: String },
    #[error("kind mismatch: expected `{expected}`, found `{found}`")]
    KindMismatch { expected: String, found: String },
    #[error("no instance for `{0}`")]
    ContextReductionFailed(String),
    #[error("instance `{candidate}` overlaps with `{existing}`")]
    OverlapError { candidate: String, existing: String },
    #[error("unit equation `{0}` has no solution")]
    UnitMismatch(String),
    #[error("malformed context: {0}")]
    MalformedContext(String),
    #[error("unknown class `{0}`")]
    UnknownClass(Name),
    #[error("class `{0}` is already declared")]
    DuplicateClass(Name),
    #[error("`{0}` is not supported by this language")]
    UnsupportedTerm(String),
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

impl TypeError {
    pub fn mismatch(left: &impl fmt::Display, right: &impl fmt::Display) -> Self {
        TypeError::RigidRigidMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn kind_mismatch(expected: &impl fmt::Display, found: &impl fmt::Display) -> Self {
        TypeError::KindMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        TypeError::MalformedContext(message.into())
    }

    /// Whether the error is a broken engine invariant rather than an
    /// ill-typed input.
    pub fn is_internal(&self) -> bool {
        matches!(self, TypeError::MalformedContext(_))
    }
}

impl IntoDiagnostic for TypeError {
    fn into_diagnostic(self) -> Diagnostic {
        let note = match &self {
            TypeError::OccursCheckFailed { .. } => Some("the type would be infinite"),
            TypeError::ContextReductionFailed(_) => {
                Some("no instance matches and the argument is not a type variable")
            }
            TypeError::MalformedContext(_) => Some("this is a bug in the inference engine"),
            _ => None,
        };
        let diagnostic = Diagnostic::error(self);
        match note {
            Some(note) => diagnostic.with_note(note),
            None => diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_malformed_contexts_are_internal() {
        assert!(TypeError::malformed("no marker").is_internal());
        assert!(!TypeError::UnboundVariable(Name::from("x")).is_internal());
    }

    #[test]
    fn internal_errors_carry_a_note() {
        let d = TypeError::malformed("no marker").into_diagnostic();
        assert_eq!(d.message, "malformed context: no marker");
        assert_eq!(d.notes, ["this is a bug in the inference engine"]);

        let d = TypeError::mismatch(&"int", &"bool").into_diagnostic();
        assert_eq!(d.message, "cannot unify `int` with `bool`");
        assert!(d.notes.is_empty());
    }
}
