//! Key-value defaults database and the storage backend built on it.
//!
//! The defaults database is a small `SQLite` file mapping string keys to
//! opaque byte values. The prospect list lives under a single key, encoded
//! the same way as the file backend.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::prospect::Prospect;

use super::{decode, encode, schema, ProspectStorage};

/// Default key under which the prospect list is saved.
pub const SAVE_KEY: &str = "SavedData";

const IN_MEMORY: &str = ":memory:";

/// A persistent string-keyed store of byte values.
#[derive(Debug)]
pub struct Defaults {
    path: PathBuf,
    conn: Connection,
}

impl Defaults {
    /// Open or create the defaults database at the given path.
    ///
    /// Creates parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not a usable defaults database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        // Open connection and bring the layout up to date
        debug!("Opening defaults database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        schema::prepare(&conn)?;

        info!("Defaults database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory defaults database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(IN_MEMORY),
            source,
        })?;
        schema::prepare(&conn)?;

        Ok(Self {
            path: PathBuf::from(IN_MEMORY),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn data(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM defaults WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO defaults (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Saves the prospect list under one key of a [`Defaults`] database.
///
/// A backend created with [`open`](Self::open) does not touch the file until
/// the first load or save. An unusable database then surfaces as an error
/// from that call, which the store logs, instead of failing construction.
/// Opening is retried on each call until it succeeds.
#[derive(Debug)]
pub struct KeyValueStorage {
    path: PathBuf,
    key: String,
    defaults: OnceCell<Defaults>,
}

impl KeyValueStorage {
    /// Backend for the database at `path`, storing under `key`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            defaults: OnceCell::new(),
        }
    }

    /// Backend over an already opened database.
    #[must_use]
    pub fn new(defaults: Defaults, key: impl Into<String>) -> Self {
        Self {
            path: defaults.path().to_path_buf(),
            key: key.into(),
            defaults: OnceCell::from(defaults),
        }
    }

    /// The key the prospect list is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying defaults database, opening it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn defaults(&self) -> Result<&Defaults> {
        if let Some(defaults) = self.defaults.get() {
            return Ok(defaults);
        }
        // A failed open leaves the cell empty so the next call retries
        let opened = Defaults::open(&self.path)?;
        Ok(self.defaults.get_or_init(|| opened))
    }
}

impl ProspectStorage for KeyValueStorage {
    fn location(&self) -> String {
        format!("{}#{}", self.path.display(), self.key)
    }

    fn load(&self) -> Result<Option<Vec<Prospect>>> {
        match self.defaults()?.data(&self.key)? {
            Some(bytes) => decode(&self.location(), &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, people: &[Prospect]) -> Result<()> {
        let bytes = encode(people)?;
        self.defaults()?.set(&self.key, &bytes)?;
        debug!("Saved {} prospects under key {}", people.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_defaults() -> Defaults {
        Defaults::open_in_memory().expect("failed to create in-memory defaults")
    }

    #[test]
    fn test_open_in_memory() {
        let defaults = create_test_defaults();
        assert_eq!(defaults.path(), Path::new(":memory:"));
        assert!(defaults.data(SAVE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let defaults = create_test_defaults();
        defaults.set("greeting", b"hello").unwrap();
        assert_eq!(defaults.data("greeting").unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_set_replaces() {
        let defaults = create_test_defaults();
        defaults.set("k", b"one").unwrap();
        defaults.set("k", b"two").unwrap();

        assert_eq!(defaults.data("k").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn test_storage_missing_key_loads_none() {
        let storage = KeyValueStorage::new(create_test_defaults(), SAVE_KEY);
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_storage_save_then_load() {
        let storage = KeyValueStorage::new(create_test_defaults(), SAVE_KEY);
        let people = vec![
            Prospect::new("Ada", "ada@example.com"),
            Prospect::new("Grace", "grace@example.com"),
        ];
        storage.save(&people).unwrap();
        assert_eq!(storage.load().unwrap(), Some(people));
    }

    #[test]
    fn test_storage_corrupt_value() {
        let storage = KeyValueStorage::new(create_test_defaults(), SAVE_KEY);
        storage
            .defaults()
            .unwrap()
            .set(SAVE_KEY, b"\x00\x01garbage")
            .unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, Error::CorruptData { .. }));
    }

    #[test]
    fn test_storage_location_includes_key() {
        let storage = KeyValueStorage::new(create_test_defaults(), "Custom");
        assert_eq!(storage.key(), "Custom");
        assert_eq!(storage.location(), ":memory:#Custom");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("defaults.db");

        {
            let defaults = Defaults::open(&path).unwrap();
            defaults.set(SAVE_KEY, b"[]").unwrap();
        }

        let reopened = Defaults::open(&path).unwrap();
        assert_eq!(reopened.data(SAVE_KEY).unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_lazy_open_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.db");

        let storage = KeyValueStorage::open(&path, SAVE_KEY);
        assert!(!path.exists());

        storage.save(&[]).unwrap();
        assert!(path.exists());
        assert_eq!(storage.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_junk_file_fails_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.db");
        std::fs::write(&path, b"this is definitely not sqlite, just junk bytes").unwrap();

        let storage = KeyValueStorage::open(&path, SAVE_KEY);

        assert!(storage.load().unwrap_err().is_storage_error());
        assert!(storage.save(&[]).unwrap_err().is_storage_error());
    }

    #[test]
    fn test_newer_layout_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION + 1)
                .unwrap();
        }

        let err = KeyValueStorage::open(&path, SAVE_KEY).load().unwrap_err();
        assert!(matches!(err, Error::DatabaseSchema { .. }));
    }
}
