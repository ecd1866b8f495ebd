//! Append-only diagnostic log for per-item failures
//!
//! One line per malformed input line or failed probe:
//! `ERROR: <YYYY/MM/DD HH:MM:SS> <context>: <detail>`. The file is opened
//! once at startup; failing to open it is fatal, failing to write a single
//! entry is not.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::IngestError;

pub struct ErrorLog {
    path: PathBuf,
    file: File,
}

impl std::fmt::Debug for ErrorLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorLog")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ErrorLog {
    /// Open (creating if absent) the log in append mode.
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| IngestError::ErrorLogUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Append one timestamped entry.
    pub fn record(&mut self, message: &str) {
        let entry = format_entry(Local::now(), message);
        if let Err(e) = self
            .file
            .write_all(entry.as_bytes())
            .and_then(|()| self.file.flush())
        {
            log::warn!("Failed to write to {}: {e}", self.path.display());
        }
    }
}

/// Render one log line. Embedded newlines are folded so each entry stays on
/// a single line.
fn format_entry<Tz: chrono::TimeZone>(at: DateTime<Tz>, message: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let message = message.trim_end().replace(['\r', '\n'], " ");
    format!("ERROR: {} {message}\n", at.format("%Y/%m/%d %H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn entry_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            format_entry(at, "bad-line-no-tab: no match"),
            "ERROR: 2024/03/09 07:05:01 bad-line-no-tab: no match\n"
        );
    }

    #[test]
    fn entry_folds_newlines() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let line = format_entry(at, "id /a: first\nsecond\n");
        assert_eq!(line, "ERROR: 2024/01/01 00:00:00 id /a: first second\n");
    }

    #[test]
    fn record_appends_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("errorlog.log");

        let mut log = ErrorLog::open(&path).unwrap();
        log.record("first");
        drop(log);
        let mut log = ErrorLog::open(&path).unwrap();
        log.record("second");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ERROR: ") && lines[0].ends_with(" first"));
        assert!(lines[1].ends_with(" second"));
    }

    #[test]
    fn open_fails_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = ErrorLog::open(&dir.path().join("no/such/dir/errorlog.log")).unwrap_err();
        assert!(matches!(err, IngestError::ErrorLogUnavailable { .. }));
    }
}
