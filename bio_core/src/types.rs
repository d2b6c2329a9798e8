//! Core domain types for the Bio-Dashboard.
//!
//! This module defines the values exchanged with the engine:
//! - Substances and logged intake events
//! - Sleep samples
//! - Per-substance rate constants
//! - Score samples and their phase labels

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Substances
// ============================================================================

/// Substance tag attached to an intake.
///
/// `Other` covers anything without a curve binding; it is stored but never
/// contributes to a load.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Substance {
    /// Lisdexamfetamine (d-amphetamine prodrug)
    Elvanse,
    /// Methylphenidate, immediate release
    Medikinet,
    /// Methylphenidate, modified release (fasted state)
    MedikinetRetard,
    /// Caffeine from a can of mate
    Mate,
    Other,
}

impl Substance {
    /// Substances with a pharmacokinetic curve, in display order
    pub const TRACKED: [Substance; 4] = [
        Substance::Elvanse,
        Substance::Medikinet,
        Substance::MedikinetRetard,
        Substance::Mate,
    ];

    /// Parse a free-form tag. Unknown tags map to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "elvanse" => Substance::Elvanse,
            "medikinet" | "medikinet_ir" => Substance::Medikinet,
            "medikinet_retard" | "medikinet_mr" => Substance::MedikinetRetard,
            "mate" | "caffeine" => Substance::Mate,
            _ => Substance::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Substance::Elvanse => "elvanse",
            Substance::Medikinet => "medikinet",
            Substance::MedikinetRetard => "medikinet_retard",
            Substance::Mate => "mate",
            Substance::Other => "other",
        }
    }

    pub fn is_tracked(&self) -> bool {
        !matches!(self, Substance::Other)
    }
}

impl From<String> for Substance {
    fn from(tag: String) -> Self {
        Substance::from_tag(&tag)
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Wall-clock formats accepted for intake and query timestamps
const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a local wall-clock timestamp.
///
/// RFC 3339 input with an offset keeps the wall clock of that offset.
/// Anything else is a validation error; nothing is coerced.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .map_err(|_| Error::Validation(format!("Invalid timestamp '{}'", raw)))
}

/// Serde adapter rendering instants as `YYYY-MM-DDTHH:MM:SS`
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Intakes
// ============================================================================

/// A validated intake event
///
/// Read-only input to the engine. A missing dose means the substance's
/// reference dose.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "IntakeRecord")]
pub struct IntakeEvent {
    pub id: Uuid,
    pub substance: Substance,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_mg: Option<f64>,
}

impl IntakeEvent {
    /// Create a new intake with a fresh id
    pub fn new(substance: Substance, timestamp: NaiveDateTime, dose_mg: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            substance,
            timestamp,
            dose_mg,
        }
    }
}

/// Unvalidated wire form of an intake (timestamp still text)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntakeRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub substance: Substance,
    pub timestamp: String,
    #[serde(default)]
    pub dose_mg: Option<f64>,
}

impl TryFrom<IntakeRecord> for IntakeEvent {
    type Error = Error;

    fn try_from(record: IntakeRecord) -> Result<Self> {
        let timestamp = parse_timestamp(&record.timestamp)?;

        if let Some(dose) = record.dose_mg {
            if !dose.is_finite() || dose <= 0.0 {
                return Err(Error::Validation(format!(
                    "Dose must be a positive number of mg, got {}",
                    dose
                )));
            }
        }

        Ok(IntakeEvent {
            id: record.id.unwrap_or_else(Uuid::new_v4),
            substance: record.substance,
            timestamp,
            dose_mg: record.dose_mg,
        })
    }
}

// ============================================================================
// Sleep and configuration values
// ============================================================================

/// Most recent sleep period relevant to an evaluation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct SleepSample {
    #[serde(default)]
    pub duration_min: Option<f64>,
    /// Tracker confidence, 0-100
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl SleepSample {
    /// Reject negative durations and confidences outside [0, 100]
    pub fn validate(&self) -> Result<()> {
        if let Some(duration) = self.duration_min {
            if !duration.is_finite() || duration < 0.0 {
                return Err(Error::Validation(format!(
                    "Sleep duration must be non-negative, got {}",
                    duration
                )));
            }
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=100.0).contains(&confidence) {
                return Err(Error::Validation(format!(
                    "Sleep confidence must be within 0-100, got {}",
                    confidence
                )));
            }
        }
        Ok(())
    }
}

/// Bateman rate constants and reference dose for one substance
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RateConstants {
    /// Absorption rate (h^-1)
    pub ka: f64,
    /// Elimination rate (h^-1)
    pub ke: f64,
    pub reference_dose_mg: f64,
}

impl RateConstants {
    pub const fn new(ka: f64, ke: f64, reference_dose_mg: f64) -> Self {
        Self {
            ka,
            ke,
            reference_dose_mg,
        }
    }
}

// ============================================================================
// Engine output
// ============================================================================

/// Discrete label for the current stimulant/circadian state
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Sleep,
    Waking,
    PeakFocus,
    ActiveFocus,
    Declining,
    LowResidual,
    MiddayDip,
    WindDown,
    Baseline,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Sleep => "sleep",
            Phase::Waking => "waking",
            Phase::PeakFocus => "peak-focus",
            Phase::ActiveFocus => "active-focus",
            Phase::Declining => "declining",
            Phase::LowResidual => "low-residual",
            Phase::MiddayDip => "midday-dip",
            Phase::WindDown => "wind-down",
            Phase::Baseline => "baseline",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One evaluated Bio-Score point with its diagnostic breakdown
///
/// Boosts and the score are rounded to 1 decimal, levels and `cns_load`
/// to 3 decimals.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoreSample {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub score: f64,
    pub circadian: f64,
    pub elvanse_boost: f64,
    pub medikinet_boost: f64,
    pub caffeine_boost: f64,
    pub sleep_modifier: f64,
    pub elvanse_level: f64,
    pub medikinet_level: f64,
    pub caffeine_level: f64,
    pub cns_load: f64,
    pub phase: Phase,
}

/// Samples for one calendar day in increasing time order
pub type DayCurve = Vec<ScoreSample>;
