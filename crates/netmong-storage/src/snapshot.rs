//! JSON snapshot of the whole store

use crate::records::Records;
use chrono::{DateTime, Utc};
use netmong_core::comment::CommentTable;
use netmong_core::error::{NetmongError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Current snapshot format version
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    comments: &'a CommentTable,
    records: &'a Records,
}

#[derive(Deserialize)]
struct SnapshotData {
    schema_version: u32,
    #[serde(default)]
    comments: CommentTable,
    #[serde(default)]
    records: Records,
}

/// Snapshot file on disk
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary path for atomic writes
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("data.json");
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Read the snapshot, or `None` if the file does not exist yet
    pub fn load(&self) -> Result<Option<(CommentTable, Records)>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(NetmongError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to open snapshot {}: {}", self.path.display(), e),
                )))
            }
        };

        let data: SnapshotData = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| NetmongError::from(e).with_context(format!("Reading {}", self.path.display())))?;

        if data.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(NetmongError::Storage(format!(
                "Snapshot {} has schema version {}, newest supported is {}",
                self.path.display(),
                data.schema_version,
                CURRENT_SCHEMA_VERSION
            )));
        }

        info!(
            "Loaded {} comments and {} posts from {:?}",
            data.comments.count(),
            data.records.post_count(),
            self.path
        );
        Ok(Some((data.comments, data.records)))
    }

    /// Write the snapshot atomically (write to temp, then rename)
    pub fn write(&self, comments: &CommentTable, records: &Records) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            NetmongError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;

        let snapshot = SnapshotRef {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            comments,
            records,
        };
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            NetmongError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved snapshot to {:?}", self.path);
        Ok(())
    }
}
