use std::fs;
use std::path::{Path, PathBuf};

use shared::SaveRecord;
use tracing::debug;

use crate::error::PersistenceError;

/// JSON save file in app-local storage.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SaveRecord, PersistenceError> {
        let json = fs::read_to_string(&self.path)?;
        let record = SaveRecord::from_json(&json)?;
        debug!("Loaded save file {}", self.path.display());
        Ok(record)
    }

    /// Writes to a sibling temp file and renames it over the save, so readers
    /// never see a half-written file.
    pub fn save(&self, record: &SaveRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = record.to_json()?;
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;

        debug!("Wrote save file {}", self.path.display());
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
