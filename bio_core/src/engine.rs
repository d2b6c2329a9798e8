//! Bio-Score composer.
//!
//! ```text
//! score = circadian(hour)          0-60
//!       + elvanse_boost            0-30
//!       + medikinet_boost          0-25 (IR + retard combined)
//!       + caffeine_boost           0-15
//!       + sleep_modifier           -20 to +10
//! clamped to [0, 100]
//! ```

use crate::load::total_load;
use crate::{
    circadian, sleep, IntakeEvent, Phase, Result, ScoreSample, Substance,
    SubstanceCurveLibrary,
};
use chrono::{NaiveDateTime, Timelike};

/// Maximum score contribution of each stimulant group
pub const ELVANSE_CAP: f64 = 30.0;
pub const MEDIKINET_CAP: f64 = 25.0;
pub const CAFFEINE_CAP: f64 = 15.0;

/// Stimulant level thresholds for the focus phases
const PEAK_FOCUS_LEVEL: f64 = 0.85;
const ACTIVE_FOCUS_LEVEL: f64 = 0.5;
const DECLINING_LEVEL: f64 = 0.2;
const LOW_RESIDUAL_LEVEL: f64 = 0.05;

/// Pure scoring engine over an injected, validated rate table
///
/// Holds no mutable state: `compose` and `generate_day` may be called from
/// any number of threads at once.
#[derive(Clone, Debug)]
pub struct BioEngine {
    library: SubstanceCurveLibrary,
}

impl Default for BioEngine {
    fn default() -> Self {
        Self::new(crate::default_library().clone())
    }
}

impl BioEngine {
    pub fn new(library: SubstanceCurveLibrary) -> Self {
        Self { library }
    }

    /// Build an engine from a loaded configuration
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        Ok(Self::new(SubstanceCurveLibrary::new(config.pharmacokinetics)?))
    }

    pub fn library(&self) -> &SubstanceCurveLibrary {
        &self.library
    }

    /// Compute the composite Bio-Score at `target`
    pub fn compose(
        &self,
        target: NaiveDateTime,
        intakes: &[IntakeEvent],
        sleep_duration_min: Option<f64>,
        sleep_confidence: Option<f64>,
    ) -> ScoreSample {
        let hour = hour_of_day(target);

        let circadian = circadian::baseline(hour);

        let elvanse_level = self.load(intakes, Substance::Elvanse, target);
        let medikinet_level = self.load(intakes, Substance::Medikinet, target)
            + self.load(intakes, Substance::MedikinetRetard, target);
        let caffeine_level = self.load(intakes, Substance::Mate, target);

        let elvanse_boost = boost(elvanse_level, ELVANSE_CAP);
        let medikinet_boost = boost(medikinet_level, MEDIKINET_CAP);
        let caffeine_boost = boost(caffeine_level, CAFFEINE_CAP);

        let sleep_modifier = sleep::modifier(sleep_duration_min, sleep_confidence);

        let raw_score =
            circadian + elvanse_boost + medikinet_boost + caffeine_boost + sleep_modifier;
        let score = raw_score.clamp(0.0, 100.0);

        // Unclamped on purpose: safety indicator, not part of the score
        let cns_load = elvanse_level + medikinet_level + caffeine_level;

        let phase = determine_phase(elvanse_level.max(medikinet_level), hour);

        tracing::trace!(
            "Bio-Score at {}: {:.1} ({}), cns_load {:.3}",
            target,
            score,
            phase,
            cns_load
        );

        ScoreSample {
            timestamp: target,
            score: round_to(score, 1),
            circadian: round_to(circadian, 1),
            elvanse_boost: round_to(elvanse_boost, 1),
            medikinet_boost: round_to(medikinet_boost, 1),
            caffeine_boost: round_to(caffeine_boost, 1),
            sleep_modifier: round_to(sleep_modifier, 1),
            elvanse_level: round_to(elvanse_level, 3),
            medikinet_level: round_to(medikinet_level, 3),
            caffeine_level: round_to(caffeine_level, 3),
            cns_load: round_to(cns_load, 3),
            phase,
        }
    }

    fn load(&self, intakes: &[IntakeEvent], substance: Substance, target: NaiveDateTime) -> f64 {
        total_load(&self.library, intakes, substance, target)
    }
}

/// Fractional hour of day; seconds are ignored
pub fn hour_of_day(ts: NaiveDateTime) -> f64 {
    ts.hour() as f64 + ts.minute() as f64 / 60.0
}

/// Level 1.0 saturates the cap; higher loads are clamped, not amplified
fn boost(level: f64, cap: f64) -> f64 {
    (level * cap).min(cap)
}

/// Classify the current phase
///
/// Rules, first match wins:
/// 1. Before 06:00 → sleep, before 07:00 → waking
/// 2. Stimulant level bands (peak-focus, active-focus, declining, low-residual)
/// 3. 12:30-14:30 → midday-dip
/// 4. From 20:00 → wind-down
/// 5. Otherwise baseline
pub fn determine_phase(stim_level: f64, hour: f64) -> Phase {
    if hour < 6.0 {
        return Phase::Sleep;
    }
    if hour < 7.0 {
        return Phase::Waking;
    }

    if stim_level >= PEAK_FOCUS_LEVEL {
        return Phase::PeakFocus;
    } else if stim_level >= ACTIVE_FOCUS_LEVEL {
        return Phase::ActiveFocus;
    } else if stim_level >= DECLINING_LEVEL {
        return Phase::Declining;
    } else if stim_level >= LOW_RESIDUAL_LEVEL {
        return Phase::LowResidual;
    }

    if (12.5..=14.5).contains(&hour) {
        return Phase::MiddayDip;
    }
    if hour >= 20.0 {
        return Phase::WindDown;
    }

    Phase::Baseline
}

/// Round to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
