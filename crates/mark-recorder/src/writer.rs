//! Append-only mark log writer.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use clipmark_common::error::{ClipmarkError, ClipmarkResult};
use clipmark_model::mark::{RawMark, MARK_LOG_HEADER};

/// Appends marks to the CSV log, creating it with a header if needed.
pub struct MarkLogWriter {
    path: PathBuf,
}

impl MarkLogWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append a single mark as one CSV row.
    pub fn append(&self, mark: &RawMark) -> ClipmarkResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        let needs_newline = !needs_header && !ends_with_newline(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // A hand-edited log may lose its final newline.
        if needs_newline {
            file.write_all(b"\n")?;
            tracing::debug!(path = %self.path.display(), "Terminated unfinished last line");
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(MARK_LOG_HEADER)?;
            tracing::info!(path = %self.path.display(), "Created mark log");
        }
        writer.serialize(mark)?;
        writer
            .flush()
            .map_err(|e| ClipmarkError::mark_log(format!("Failed to flush mark: {e}")))?;

        Ok(())
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn ends_with_newline(path: &Path) -> ClipmarkResult<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
