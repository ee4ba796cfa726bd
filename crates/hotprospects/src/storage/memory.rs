//! In-process storage backend.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::prospect::Prospect;

use super::{decode, encode, ProspectStorage};

const LOCATION: &str = "memory";

#[derive(Debug, Default)]
struct MemoryState {
    data: Option<Vec<u8>>,
    fail_writes: bool,
    writes: usize,
}

/// Keeps the encoded prospect list in memory.
///
/// Clones share the same contents, so a test can hand one clone to a store
/// and inspect or tamper with the saved bytes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStorage {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with raw saved bytes.
    #[must_use]
    pub fn with_raw(bytes: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        storage.set_raw(bytes);
        storage
    }

    /// The raw saved bytes, if anything was saved.
    #[must_use]
    pub fn raw(&self) -> Option<Vec<u8>> {
        self.state.borrow().data.clone()
    }

    /// Replace the saved bytes.
    pub fn set_raw(&self, bytes: impl Into<Vec<u8>>) {
        self.state.borrow_mut().data = Some(bytes.into());
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }
}

impl ProspectStorage for MemoryStorage {
    fn location(&self) -> String {
        LOCATION.to_string()
    }

    fn load(&self) -> Result<Option<Vec<Prospect>>> {
        match &self.state.borrow().data {
            Some(bytes) => decode(LOCATION, bytes).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, people: &[Prospect]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        // Rejected writes leave the previous bytes untouched
        if state.fail_writes {
            return Err(Error::storage_write(LOCATION, "writes are disabled"));
        }
        state.data = Some(encode(people)?);
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_loads_none() {
        assert!(MemoryStorage::new().load().unwrap().is_none());
    }

    #[test]
    fn test_clones_share_contents() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage
            .save(&[Prospect::new("Ada", "ada@example.com")])
            .unwrap();

        assert_eq!(handle.load().unwrap().unwrap().len(), 1);
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn test_failing_writes_keep_previous_data() {
        let storage = MemoryStorage::with_raw("[]");
        storage.set_fail_writes(true);

        let err = storage
            .save(&[Prospect::new("Ada", "ada@example.com")])
            .unwrap_err();
        assert!(matches!(err, Error::StorageWrite { .. }));
        assert_eq!(storage.raw(), Some(b"[]".to_vec()));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_corrupt_raw() {
        let storage = MemoryStorage::with_raw("nope");
        assert!(matches!(
            storage.load().unwrap_err(),
            Error::CorruptData { .. }
        ));
    }
}
