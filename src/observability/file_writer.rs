//! File-based report writer with automatic daily rotation.
//!
//! When a log directory is configured, report records are appended as JSON
//! lines to `web_log_collector.log` inside it. The writer rotates the file
//! daily (at UTC midnight) by renaming the current file with a date suffix
//! (e.g. `web_log_collector.log.2026-08-30`) and starting a new one.
//!
//! Thread-safe: a `Mutex<BufWriter>` guards the file so concurrent request
//! handlers can append without interleaving lines.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

const FILE_NAME: &str = "web_log_collector.log";

/// A daily-rotating JSON-lines writer for report records.
pub struct ReportFileWriter {
    path: PathBuf,
    inner: Mutex<WriterState>,
}

struct WriterState {
    file: BufWriter<File>,
    opened_on: NaiveDate,
}

impl ReportFileWriter {
    /// Open (or create) the log file inside `directory`.
    ///
    /// The directory itself must already exist; startup validates that
    /// before the server accepts traffic.
    pub fn open(directory: &Path) -> io::Result<Self> {
        let path = directory.join(FILE_NAME);
        let file = Self::open_file(&path)?;
        Ok(Self {
            path,
            inner: Mutex::new(WriterState {
                file,
                opened_on: Utc::now().date_naive(),
            }),
        })
    }

    /// Append one line, rotating first if the UTC day has changed.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut state = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let today = Utc::now().date_naive();
        if today != state.opened_on {
            self.rotate(&mut state, today)?;
        }

        state.file.write_all(line.as_bytes())?;
        state.file.write_all(b"\n")?;
        state.file.flush()
    }

    fn rotate(&self, state: &mut WriterState, today: NaiveDate) -> io::Result<()> {
        state.file.flush()?;

        let rotated = self
            .path
            .with_file_name(format!("{FILE_NAME}.{}", state.opened_on));
        if let Err(error) = std::fs::rename(&self.path, &rotated) {
            // Keep appending to the current file rather than losing records.
            tracing::warn!(%error, rotated = %rotated.display(), "Failed to rotate the report log file");
        } else {
            state.file = Self::open_file(&self.path)?;
            tracing::info!(rotated = %rotated.display(), "Rotated the report log file");
        }

        state.opened_on = today;
        Ok(())
    }

    fn open_file(path: &Path) -> io::Result<BufWriter<File>> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_json_lines() {
        let dir = std::env::temp_dir().join(format!("wlc-writer-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let writer = ReportFileWriter::open(&dir).unwrap();
        writer.write_line(r#"{"message":"one"}"#).unwrap();
        writer.write_line(r#"{"message":"two"}"#).unwrap();

        let contents = std::fs::read_to_string(dir.join(FILE_NAME)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("one"));
        assert!(lines[1].contains("two"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
