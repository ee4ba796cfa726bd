//! JSON document file backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::prospect::Prospect;

use super::{decode, encode, ProspectStorage};

/// Stores the prospect list as a JSON file.
///
/// Saves go through a sibling temp file and a rename, so a crash mid-write
/// leaves the previous contents in place.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a backend for the given file. Nothing is touched until the
    /// first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the document file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProspectStorage for JsonFileStorage {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<Vec<Prospect>>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            // Nothing saved yet
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode(&self.location(), &bytes).map(Some)
    }

    fn save(&self, people: &[Prospect]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        // Write beside the target, then swap it in
        let bytes = encode(people)?;
        let temp = self.temp_path();
        std::fs::write(&temp, &bytes)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(
            "Saved {} prospects to {}",
            people.len(),
            self.path.display()
        );
        Ok(())
    }
}
