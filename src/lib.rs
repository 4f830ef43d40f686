//! Hindley-Milner type inference over an ordered context, with type
//! classes and units of measure.
//!
//! The work is done by the `term_solve` engine; this crate re-exports the
//! pieces and offers `check_*` entry points that report failures as a
//! rendered [`Report`].

pub mod driver;

pub use term_common as common;
pub use term_core as core;
pub use term_diag as diag;
pub use term_print as print;
pub use term_solve as solve;

pub use driver::{check, check_basic, check_classes, check_units};
pub use term_diag::Report;
pub use term_solve::Options;
