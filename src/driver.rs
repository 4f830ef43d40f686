use term_core as core;
use term_diag as diag;
use term_solve as solve;

use core::{basic, classes, units, Term};
use diag::Report;
use solve::{InferenceState, Language, Options, QualifiedOf};

use tracing::debug;

/// Infers the type of `term` in any language, reporting a failure as a
/// diagnostic.
pub fn check<L: Language>(
    initial: InferenceState<L>,
    term: &Term,
    options: &Options,
) -> Result<QualifiedOf<L>, Report> {
    debug!("checking {}", term);
    solve::hm::infer_with(initial, term, options).map_err(Report::from)
}

pub fn check_basic(
    initial: InferenceState<solve::basic::Basic>,
    term: &Term,
    options: &Options,
) -> Result<basic::Type, Report> {
    debug!("checking {}", term);
    solve::basic::infer_with(initial, term, options).map_err(Report::from)
}

pub fn check_classes(
    initial: InferenceState<solve::classes::Classes>,
    term: &Term,
    options: &Options,
) -> Result<classes::QualifiedType, Report> {
    debug!("checking {}", term);
    solve::classes::infer_with(initial, term, options).map_err(Report::from)
}

pub fn check_units(
    initial: InferenceState<solve::units::Units>,
    term: &Term,
    options: &Options,
) -> Result<units::Type, Report> {
    debug!("checking {}", term);
    solve::units::infer_with(initial, term, options).map_err(Report::from)
}
