use log::info;
use std::fs;
use std::path::PathBuf;

use crate::data::Snapshot;
use crate::error::{Error, Result};

/// Source of snapshots. Each call hands out an independent copy.
pub trait Repository {
    fn load_snapshot(&self) -> Result<Snapshot>;
}

/// A snapshot already in memory serves copies of itself.
impl Repository for Snapshot {
    fn load_snapshot(&self) -> Result<Snapshot> {
        Ok(self.clone())
    }
}

/// Reads a JSON snapshot from disk on every load.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Repository for JsonFileRepository {
    fn load_snapshot(&self) -> Result<Snapshot> {
        let data = fs::read_to_string(&self.path).map_err(|source| Error::RepositoryUnavailable {
            path: self.path.clone(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_str(&data)?;
        info!(
            "Loaded snapshot from '{}': {} courses, {} faculty, {} rooms, {} groups",
            self.path.display(),
            snapshot.courses.len(),
            snapshot.faculty.len(),
            snapshot.rooms.len(),
            snapshot.student_groups.len()
        );
        Ok(snapshot)
    }
}
