//! Atomic JSON file operations.
//!
//! Provides a thin layer for safe writes of the small client-side records:
//! updates go to a temporary file first and are moved into place with an
//! atomic rename, so a crash mid-write never leaves a half-written record.

use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::PathBuf;

use portal_core::error::{PortalError, Result};

/// A handle to an atomically written JSON file.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a new handle for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    /// Loads the file and deserializes it.
    ///
    /// A missing or empty file is `Ok(None)`; an unreadable or unparsable
    /// file is an error for the caller to interpret.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes and writes the data atomically (temp file + rename).
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(data)?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(serialized.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| PortalError::storage(format!("failed to move record into place: {}", e)))
    }

    /// Removes the file if it exists.
    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// The path this handle writes to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
