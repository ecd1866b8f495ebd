//! Append-only record store
//!
//! On disk the store is a JSON Lines file, one record per line. It is loaded
//! fully into memory once, then grown one record at a time. Every append is
//! its own open/write/sync/close cycle, so a process killed between items
//! leaves every completed record intact. A write torn in the middle of a
//! record is not repaired: the next load reports it as
//! [`IngestError::CorruptStore`].

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::IngestError;
use crate::model::{Identifier, Record};

/// Identifier-keyed view of the store file plus its append discipline.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    records: FxHashMap<Identifier, Record>,
    /// Last byte on disk is not a newline (a complete record whose
    /// terminator was lost). The next append starts a fresh line.
    unterminated_tail: bool,
}

impl Store {
    /// Load the store at `path`; a missing file yields an empty store.
    ///
    /// Entries are replayed in file order. Duplicate identifiers are
    /// tolerated and the later entry wins.
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No store at {}, starting empty", path.display());
                return Ok(Self::empty(path));
            }
            Err(source) => {
                return Err(IngestError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut records = FxHashMap::default();
        let mut duplicates = 0usize;
        for (idx, line) in bytes.split(|&b| b == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let record: Record =
                serde_json::from_slice(line).map_err(|source| IngestError::CorruptStore {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })?;
            if records.insert(record.id().clone(), record).is_some() {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            log::warn!(
                "{}: {duplicates} duplicate identifier(s), keeping the latest entry of each",
                path.display()
            );
        }
        log::info!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            records,
            unterminated_tail: bytes.last().is_some_and(|&b| b != b'\n'),
        })
    }

    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            records: FxHashMap::default(),
            unterminated_tail: false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably append one record, then make it visible to [`Store::contains`].
    ///
    /// The serialized line goes out in a single write and is synced before
    /// the handle is closed. The in-memory map is only updated once the
    /// write succeeded.
    pub fn append(&mut self, record: Record) -> Result<(), IngestError> {
        let write_err = |source: std::io::Error| IngestError::StoreWrite {
            path: self.path.clone(),
            source,
        };

        let mut line = Vec::with_capacity(256);
        if self.unterminated_tail {
            line.push(b'\n');
        }
        serde_json::to_writer(&mut line, &record).map_err(|e| write_err(e.into()))?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(&line).map_err(write_err)?;
        file.sync_data().map_err(write_err)?;
        drop(file);

        self.unterminated_tail = false;
        self.records.insert(record.id().clone(), record);
        Ok(())
    }
}
