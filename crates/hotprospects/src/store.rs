//! The prospect store.
//!
//! [`ProspectStore`] is the single owner of the prospect list. Every mutation
//! follows the same sequence:
//!
//! 1. subscribers are told what is about to change,
//! 2. the in-memory list is changed,
//! 3. the whole list is written to storage.
//!
//! A failed write is logged and returned to the caller, but the in-memory
//! change is kept: memory is the effective truth until the process exits.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::filter::FilterType;
use crate::prospect::{Prospect, ProspectId};
use crate::storage::ProspectStorage;

/// A change the store is about to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// A prospect is being appended.
    Added(ProspectId),
    /// A prospect's contacted flag is being flipped.
    Toggled(ProspectId),
    /// The list is being reordered by name.
    Sorted,
}

/// Handle returned by [`ProspectStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreChange)>;

/// Ordered, observable, persisted list of prospects.
pub struct ProspectStore {
    people: Vec<Prospect>,
    index: HashMap<ProspectId, usize>,
    storage: Box<dyn ProspectStorage>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ProspectStore {
    /// Build a store from whatever `storage` holds.
    ///
    /// Missing data gives an empty store. Unreadable or corrupt data is
    /// logged and also gives an empty store; it is never an error.
    #[must_use]
    pub fn load(storage: Box<dyn ProspectStorage>) -> Self {
        let people = match storage.load() {
            Ok(Some(people)) => {
                info!(
                    "Loaded {} prospects from {}",
                    people.len(),
                    storage.location()
                );
                people
            }
            Ok(None) => {
                debug!("No saved prospects at {}", storage.location());
                Vec::new()
            }
            Err(e) => {
                warn!(
                    "Could not load prospects from {}, starting empty: {e}",
                    storage.location()
                );
                Vec::new()
            }
        };

        let mut store = Self {
            people,
            index: HashMap::new(),
            storage,
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        store.rebuild_index();
        store
    }

    /// All prospects in their current order.
    #[must_use]
    pub fn people(&self) -> &[Prospect] {
        &self.people
    }

    /// Look up a prospect by identifier.
    #[must_use]
    pub fn get(&self, id: ProspectId) -> Option<&Prospect> {
        self.index.get(&id).map(|&i| &self.people[i])
    }

    /// Number of prospects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the store holds no prospects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Prospects matching `filter`, in store order.
    #[must_use]
    pub fn filtered(&self, filter: FilterType) -> Vec<&Prospect> {
        filter.apply(&self.people)
    }

    /// Where the list is persisted.
    #[must_use]
    pub fn storage_location(&self) -> String {
        self.storage.location()
    }

    /// Register a callback invoked immediately before each mutation.
    ///
    /// The store cannot be borrowed from inside the callback; re-read it
    /// once the mutating call has returned.
    pub fn subscribe(&mut self, callback: impl FnMut(&StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Append a prospect and save.
    ///
    /// No duplicate detection or field validation is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if saving failed. The prospect is kept in memory
    /// regardless.
    pub fn add(&mut self, prospect: Prospect) -> Result<()> {
        let id = prospect.id();
        self.notify(StoreChange::Added(id));

        // Appending keeps every existing position valid
        self.index.insert(id, self.people.len());
        self.people.push(prospect);
        debug!("Added prospect {id}");

        self.persist()
    }

    /// Flip the contacted flag of the prospect with the given id and save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProspectNotFound`] (without notifying or saving) for
    /// an unknown id, or a storage error if saving failed. In the latter case
    /// the flag stays flipped in memory.
    pub fn toggle(&mut self, id: ProspectId) -> Result<()> {
        let Some(&position) = self.index.get(&id) else {
            return Err(Error::ProspectNotFound(id));
        };

        // Unknown ids return above, before anyone is told
        self.notify(StoreChange::Toggled(id));

        let prospect = &mut self.people[position];
        prospect.toggle_contacted();
        debug!(
            "Prospect {id} is now {}",
            if prospect.is_contacted() {
                "contacted"
            } else {
                "uncontacted"
            }
        );

        self.persist()
    }

    /// Reorder the list by name.
    ///
    /// Ordering is byte-wise and case-sensitive; equal names keep their
    /// relative order. The new order is not saved, so the next load returns
    /// the last saved order.
    pub fn sort_by_name(&mut self) {
        self.notify(StoreChange::Sorted);
        // `sort_by` is stable, so equal names keep their order
        self.people.sort_by(|a, b| a.name.cmp(&b.name));
        self.rebuild_index();
    }

    fn notify(&mut self, change: StoreChange) {
        for (_, callback) in &mut self.subscribers {
            callback(&change);
        }
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .people
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id(), i))
            .collect();
    }

    // Always writes the whole list
    fn persist(&self) -> Result<()> {
        self.storage.save(&self.people).map_err(|e| {
            warn!(
                "Failed to save {} prospects to {}: {e}",
                self.people.len(),
                self.storage.location()
            );
            e
        })
    }
}

impl fmt::Debug for ProspectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProspectStore")
            .field("people", &self.people)
            .field("storage", &self.storage.location())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
