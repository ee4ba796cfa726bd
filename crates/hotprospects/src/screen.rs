//! The prospects screen.
//!
//! Turns the store's contents into display rows for one [`FilterType`] and
//! runs the user actions: scan-to-add, toggle, sort and remind. Failures in
//! these flows are logged and never surfaced to the user; each action still
//! returns what happened so callers (and tests) can tell.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::filter::FilterType;
use crate::notify::{ReminderOutcome, ReminderScheduler};
use crate::prospect::{Prospect, ProspectId};
use crate::scan::{ScanPayload, ScanResult};
use crate::store::ProspectStore;

/// Marker shown next to a contacted prospect.
pub const CONTACTED_MARKER: &str = "[x]";

/// Marker shown next to an uncontacted prospect.
pub const UNCONTACTED_MARKER: &str = "[ ]";

/// One rendered line of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProspectRow {
    /// Prospect identifier.
    pub id: ProspectId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email_address: String,
    /// Contacted flag.
    pub is_contacted: bool,
    /// Label of the toggle action.
    pub toggle_label: &'static str,
    /// Whether the "Remind Me" action is offered.
    pub can_remind: bool,
}

impl ProspectRow {
    fn from_prospect(prospect: &Prospect) -> Self {
        let is_contacted = prospect.is_contacted();
        Self {
            id: prospect.id(),
            name: prospect.name.clone(),
            email_address: prospect.email_address.clone(),
            is_contacted,
            toggle_label: if is_contacted {
                "Mark Uncontacted"
            } else {
                "Mark Contacted"
            },
            can_remind: !is_contacted,
        }
    }

    /// Contacted marker for text output.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        if self.is_contacted {
            CONTACTED_MARKER
        } else {
            UNCONTACTED_MARKER
        }
    }
}

/// A filtered view over the store plus its actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProspectsScreen {
    filter: FilterType,
}

impl ProspectsScreen {
    /// Screen showing `filter`.
    #[must_use]
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// The active filter.
    #[must_use]
    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Navigation title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.filter.title()
    }

    /// Rows for the store's current contents, recomputed on every call.
    #[must_use]
    pub fn rows(&self, store: &ProspectStore) -> Vec<ProspectRow> {
        store
            .filtered(self.filter)
            .into_iter()
            .map(ProspectRow::from_prospect)
            .collect()
    }

    /// Handle the result of a scan.
    ///
    /// Adds a prospect for a two-line payload and returns its id. Malformed
    /// payloads and scan failures add nothing. A failed save still returns
    /// the id since the prospect stays in the store.
    pub fn handle_scan(&self, store: &mut ProspectStore, result: ScanResult) -> Option<ProspectId> {
        let prospect = match scanned_prospect(result) {
            Ok(prospect) => prospect,
            // A broken camera is worth a warning; a stray code is not
            Err(e @ Error::Scan(_)) => {
                warn!("{e}");
                return None;
            }
            Err(e) => {
                debug!("Ignoring scan: {e}");
                return None;
            }
        };

        let id = prospect.id();
        if let Err(e) = store.add(prospect) {
            debug!("Prospect {id} kept in memory only: {e}");
        }
        Some(id)
    }

    /// Flip a prospect's contacted flag. Returns false for an unknown id.
    pub fn toggle(&self, store: &mut ProspectStore, id: ProspectId) -> bool {
        match store.toggle(id) {
            Ok(()) => true,
            // The flag flipped; only the save failed
            Err(e) if e.is_storage_error() => {
                debug!("Toggle of {id} kept in memory only: {e}");
                true
            }
            Err(e) => {
                debug!("Cannot toggle: {e}");
                false
            }
        }
    }

    /// Sort the store by name.
    pub fn sort_by_name(&self, store: &mut ProspectStore) {
        store.sort_by_name();
    }

    /// Schedule a reminder for a prospect.
    ///
    /// Returns `None` when the prospect is unknown or the notification
    /// centre failed.
    pub async fn remind(
        &self,
        store: &ProspectStore,
        reminders: &ReminderScheduler,
        id: ProspectId,
    ) -> Option<ReminderOutcome> {
        let Some(prospect) = store.get(id) else {
            debug!("Cannot remind: no prospect with id {id}");
            return None;
        };

        match reminders.schedule(prospect).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("Could not schedule reminder for {id}: {e}");
                None
            }
        }
    }
}

/// The prospect a scan result describes.
fn scanned_prospect(result: ScanResult) -> Result<Prospect> {
    let code = result?;
    Ok(ScanPayload::parse(&code)?.into_prospect())
}
