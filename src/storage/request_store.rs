use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Local, NaiveDateTime};
use tempfile::NamedTempFile;

use crate::model::error::StorageError;
use crate::model::response_record::ResponseRecord;
use crate::model::support_request::SupportRequest;

const DEFAULT_NAME_ATTEMPTS: u32 = 1000;

/// A record read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub path: PathBuf,
    pub content: String,
}

impl StoredRecord {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Directory of response records, one text file per exchange.
pub struct RequestStore {
    dir: PathBuf,
    clock: fn() -> NaiveDateTime,
    max_name_attempts: u32,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl RequestStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            clock: local_now,
            max_name_attempts: DEFAULT_NAME_ATTEMPTS,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// How many `_N` names `save` tries before giving up.
    pub fn with_max_name_attempts(mut self, attempts: u32) -> Self {
        self.max_name_attempts = attempts.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }

    /// Persists one record and returns its path.
    ///
    /// The body goes to a temp file in the same directory first and is then
    /// renamed into place, so a reader never sees half a record. An existing
    /// file with the same name is never replaced; `_2`, `_3`, ... are tried.
    pub fn save(
        &self,
        request: &SupportRequest,
        response_text: &str,
    ) -> Result<PathBuf, StorageError> {
        let record = ResponseRecord::new((self.clock)(), request.text(), response_text);
        self.save_record(&record)
    }

    pub fn save_record(&self, record: &ResponseRecord) -> Result<PathBuf, StorageError> {
        self.init()?;

        let write_err = |source| StorageError::Write {
            path: self.dir.clone(),
            source,
        };

        let mut pending = tempfile::Builder::new()
            .prefix(".record-")
            .suffix(".partial")
            .tempfile_in(&self.dir)
            .map_err(write_err)?;
        pending
            .write_all(record.render().as_bytes())
            .map_err(write_err)?;
        pending.as_file().sync_all().map_err(write_err)?;

        self.persist(pending, record)
    }

    /// Renames a fully written temp file to the first free record name.
    /// On error the temp file is dropped and removed; existing records are untouched.
    fn persist(
        &self,
        mut pending: NamedTempFile,
        record: &ResponseRecord,
    ) -> Result<PathBuf, StorageError> {
        for attempt in 1..=self.max_name_attempts {
            let path = self.dir.join(record.file_name(attempt));
            match pending.persist_noclobber(&path) {
                Ok(_) => {
                    log::info!("Saved response record to {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    log::debug!("{} already exists, trying next name", path.display());
                    pending = e.file;
                }
                Err(e) => {
                    return Err(StorageError::Write {
                        path,
                        source: e.error,
                    })
                }
            }
        }

        Err(StorageError::TooManyCollisions {
            stem: record.file_stem(),
            attempts: self.max_name_attempts,
        })
    }

    /// Newest record by creation time, or `None` when nothing was saved yet.
    pub fn load_latest(&self) -> Result<Option<StoredRecord>, StorageError> {
        let read_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StorageError::Read { path, source }
        };

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_err(&self.dir)(e)),
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry.map_err(read_err(&self.dir))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }

            let meta = entry.metadata().map_err(read_err(&path))?;
            if !meta.is_file() {
                continue;
            }
            let created = meta
                .created()
                .or_else(|_| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            let is_newer = match &newest {
                None => true,
                Some((time, best)) => (created, &path) > (*time, best),
            };
            if is_newer {
                newest = Some((created, path));
            }
        }

        let Some((_, path)) = newest else {
            return Ok(None);
        };

        let content = fs::read_to_string(&path).map_err(read_err(&path))?;
        Ok(Some(StoredRecord { path, content }))
    }
}
