//! Durable storage for the prospect list.
//!
//! The whole collection is saved as one JSON array at a fixed location and
//! overwritten on every save. Three backends share that format:
//! - [`JsonFileStorage`]: a document file in the per-user data directory
//! - [`KeyValueStorage`]: a single key in a `SQLite` backed defaults database
//! - [`MemoryStorage`]: process-local, for tests and embedding

pub mod defaults;
pub mod file;
pub mod memory;
pub mod schema;

use tracing::debug;

use crate::config::{Config, StorageBackend};
use crate::error::{Error, Result};
use crate::prospect::Prospect;

pub use defaults::{Defaults, KeyValueStorage};
pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// A place the prospect list can be loaded from and saved to.
pub trait ProspectStorage {
    /// Human-readable description of where data lives (for logging).
    fn location(&self) -> String;

    /// Load the saved collection.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be read or decoded.
    fn load(&self) -> Result<Option<Vec<Prospect>>>;

    /// Replace the saved collection with `people`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be encoded or written.
    fn save(&self, people: &[Prospect]) -> Result<()>;
}

/// Build the backend selected by the configuration.
///
/// Nothing is read or created here. Problems with the underlying file or
/// database show up on the first load or save.
#[must_use]
pub fn open(config: &Config) -> Box<dyn ProspectStorage> {
    match config.storage.backend {
        StorageBackend::File => {
            let path = config.prospects_file_path();
            debug!("Using file storage at {}", path.display());
            Box::new(JsonFileStorage::new(path))
        }
        StorageBackend::KeyValue => {
            let path = config.database_path();
            debug!(
                "Using key-value storage at {} under {}",
                path.display(),
                config.storage.save_key
            );
            Box::new(KeyValueStorage::open(path, config.storage.save_key.clone()))
        }
    }
}

/// Encode a collection in the on-disk format.
pub(crate) fn encode(people: &[Prospect]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(people)?)
}

/// Decode a collection, attributing parse failures to `location`.
pub(crate) fn decode(location: &str, bytes: &[u8]) -> Result<Vec<Prospect>> {
    serde_json::from_slice(bytes).map_err(|source| Error::CorruptData {
        location: location.to_string(),
        source,
    })
}
