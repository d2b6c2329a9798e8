//! Append-only intake log.
//!
//! Intakes are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access.

use crate::{IntakeEvent, Result};
use chrono::NaiveDateTime;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Sink trait for persisting intakes
pub trait IntakeSink {
    fn append(&mut self, intake: &IntakeEvent) -> Result<()>;
}

/// JSONL-based intake log with file locking
pub struct IntakeLog {
    path: PathBuf,
}

impl IntakeLog {
    /// Create a new intake log for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl IntakeSink for IntakeLog {
    fn append(&mut self, intake: &IntakeEvent) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(intake)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Logged {} intake {} at {}",
            intake.substance,
            intake.id,
            intake.timestamp
        );
        Ok(())
    }
}

/// Read all intakes from a log file
///
/// Lines that fail to parse or validate (e.g. a bad timestamp) are logged
/// and skipped; one bad record never hides the rest.
pub fn read_intakes(path: &Path) -> Result<Vec<IntakeEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut intakes = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<IntakeEvent>(&line) {
            Ok(intake) => intakes.push(intake),
            Err(e) => {
                tracing::warn!("Skipping intake at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} intakes from {:?}", intakes.len(), path);
    Ok(intakes)
}

/// Intakes with `start <= timestamp < end`, oldest first
pub fn list_intakes(
    path: &Path,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<IntakeEvent>> {
    let mut intakes: Vec<_> = read_intakes(path)?
        .into_iter()
        .filter(|i| i.timestamp >= start && i.timestamp < end)
        .collect();
    intakes.sort_by_key(|i| i.timestamp);
    Ok(intakes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Substance;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_append_and_read_single_intake() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("intakes.jsonl");

        let intake = IntakeEvent::new(Substance::Elvanse, at(4, 8, 0), Some(40.0));

        let mut log = IntakeLog::new(&log_path);
        log.append(&intake).unwrap();

        let intakes = read_intakes(&log_path).unwrap();
        assert_eq!(intakes, vec![intake]);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("nested/dir/intakes.jsonl");

        let mut log = IntakeLog::new(&log_path);
        log.append(&IntakeEvent::new(Substance::Mate, at(4, 9, 0), None))
            .unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_read_missing_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("nonexistent.jsonl");

        assert!(read_intakes(&log_path).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("intakes.jsonl");

        let contents = [
            r#"{"substance":"elvanse","timestamp":"2024-03-04T08:00:00","dose_mg":40}"#,
            r#"{"substance":"mate","timestamp":"half past nine"}"#,
            "",
            "{ truncated",
            r#"{"substance":"medikinet","timestamp":"2024-03-04T11:00:00","dose_mg":-10}"#,
            r#"{"substance":"kombucha","timestamp":"2024-03-04 12:00:00"}"#,
        ]
        .join("\n");
        std::fs::write(&log_path, contents).unwrap();

        let intakes = read_intakes(&log_path).unwrap();
        assert_eq!(intakes.len(), 2);
        assert_eq!(intakes[0].substance, Substance::Elvanse);
        assert_eq!(intakes[0].dose_mg, Some(40.0));
        assert_eq!(intakes[1].substance, Substance::Other);
        assert_eq!(intakes[1].timestamp, at(4, 12, 0));
    }

    #[test]
    fn test_list_intakes_in_range() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("intakes.jsonl");
        let mut log = IntakeLog::new(&log_path);

        // Appended out of order on purpose
        for ts in [at(4, 14, 0), at(3, 22, 0), at(4, 8, 0), at(5, 0, 0), at(4, 0, 0)] {
            log.append(&IntakeEvent::new(Substance::Mate, ts, None)).unwrap();
        }

        let day = list_intakes(&log_path, at(4, 0, 0), at(5, 0, 0)).unwrap();
        let times: Vec<_> = day.iter().map(|i| i.timestamp).collect();
        assert_eq!(times, vec![at(4, 0, 0), at(4, 8, 0), at(4, 14, 0)]);
    }
}
