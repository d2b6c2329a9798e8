//! Substance load aggregation.
//!
//! Linear superposition: `C_total(t) = sum_i C_i(t - t_i)` over every intake of
//! one substance. Order of the intakes does not matter.

use crate::{IntakeEvent, Substance, SubstanceCurveLibrary};
use chrono::NaiveDateTime;

/// Contributions at or below this are dropped from the sum
pub const NEGLIGIBLE_EFFECT: f64 = 0.005;

/// Hours elapsed from `from` to `to` (negative when `to` is earlier)
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let elapsed = to - from;
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 3_600_000_000.0,
        None => elapsed.num_seconds() as f64 / 3600.0,
    }
}

/// Sum the dose-scaled effect of all intakes of `substance` at `target`.
///
/// Intakes after `target` contribute nothing. A missing dose falls back to
/// the substance's reference dose.
pub fn total_load(
    library: &SubstanceCurveLibrary,
    intakes: &[IntakeEvent],
    substance: Substance,
    target: NaiveDateTime,
) -> f64 {
    let Some(reference_dose) = library.reference_dose(substance) else {
        return 0.0;
    };

    intakes
        .iter()
        .filter(|intake| intake.substance == substance)
        .map(|intake| {
            let hours_since = hours_between(intake.timestamp, target);
            let dose = intake.dose_mg.unwrap_or(reference_dose);
            library.effect(substance, hours_since, dose)
        })
        .filter(|effect| *effect > NEGLIGIBLE_EFFECT)
        .sum()
}
