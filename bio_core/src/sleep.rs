//! Sleep quality modifier and latest-sleep-sample storage.
//!
//! The latest sample lives in a small JSON file written by `bio sleep` or by
//! an external health sync:
//!
//! ```json
//! { "duration_min": 412, "confidence": 85, "recorded_at": "2024-03-04T07:10:00" }
//! ```

use crate::export::write_atomically;
use crate::{Result, SleepSample};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Score adjustment (-20 to +10) for last night's sleep.
///
/// Absent duration is neutral. A positive confidence scales the banded value
/// by `confidence / 100`.
pub fn modifier(duration_min: Option<f64>, confidence: Option<f64>) -> f64 {
    let Some(duration_min) = duration_min else {
        return 0.0;
    };

    let hours = duration_min / 60.0;
    let base = if hours < 5.0 {
        -20.0
    } else if hours < 6.0 {
        -10.0
    } else if hours < 7.0 {
        -5.0
    } else if hours < 8.0 {
        0.0
    } else if hours < 9.0 {
        5.0
    } else {
        10.0
    };

    match confidence {
        Some(confidence) if confidence > 0.0 => base * (confidence / 100.0),
        _ => base,
    }
}

/// On-disk format of the latest sleep sample
#[derive(Debug, Serialize, Deserialize)]
struct SleepSampleFile {
    #[serde(flatten)]
    sample: SleepSample,
    #[serde(default)]
    recorded_at: Option<NaiveDateTime>,
}

/// Load the latest sleep sample
///
/// Returns None if the file doesn't exist, can't be parsed, or holds
/// out-of-range values. Sleep data is optional input, so problems are logged
/// rather than surfaced.
pub fn latest_sleep_sample(path: &Path) -> Result<Option<SleepSample>> {
    if !path.exists() {
        tracing::debug!("No sleep sample found at {:?}", path);
        return Ok(None);
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                "Failed to read sleep sample at {:?}: {}. Ignoring sample.",
                path,
                e
            );
            return Ok(None);
        }
    };

    let file: SleepSampleFile = match serde_json::from_str(&contents) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(
                "Failed to parse sleep sample at {:?}: {}. Ignoring sample.",
                path,
                e
            );
            return Ok(None);
        }
    };

    if let Err(e) = file.sample.validate() {
        tracing::warn!("Sleep sample at {:?} rejected: {}", path, e);
        return Ok(None);
    }

    tracing::info!(
        "Loaded sleep sample: {:?} min (confidence {:?}) recorded {:?}",
        file.sample.duration_min,
        file.sample.confidence,
        file.recorded_at
    );

    Ok(Some(file.sample))
}

/// Validate and atomically store a sleep sample as the latest one
pub fn save_sleep_sample(
    path: &Path,
    sample: &SleepSample,
    recorded_at: NaiveDateTime,
) -> Result<()> {
    sample.validate()?;

    let file = SleepSampleFile {
        sample: *sample,
        recorded_at: Some(recorded_at),
    };
    let contents = serde_json::to_string_pretty(&file)?;

    write_atomically(path, |writer| {
        writer.write_all(contents.as_bytes())?;
        Ok(())
    })?;

    tracing::debug!("Saved sleep sample to {:?}", path);
    Ok(())
}
