//! CSV export of day curves.
//!
//! Files are written to a temp file in the destination directory, synced,
//! then renamed into place so readers never see a partial export.

use crate::{Error, Result, ScoreSample};
use fs2::FileExt;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `samples` as CSV with a header row of the sample field names.
///
/// Returns the number of rows written.
pub fn write_day_curve_csv(samples: &[ScoreSample], path: &Path) -> Result<usize> {
    write_atomically(path, |writer| {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);
        for sample in samples {
            csv_writer.serialize(sample)?;
        }
        csv_writer.flush()?;
        Ok(())
    })?;

    tracing::info!("Exported {} samples to {:?}", samples.len(), path);
    Ok(samples.len())
}

/// Atomically replace `path` with whatever `write` produces
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    // Serialize concurrent writers
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
