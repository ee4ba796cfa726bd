//! `hotprospects` - Track the people you meet while networking
//!
//! Prospects are added by scanning a QR code holding a name and an email
//! address, marked contacted or uncontacted, and can be given a follow-up
//! reminder through a local notification centre.
//!
//! The pieces:
//! - [`ProspectStore`]: the observable, persisted list of prospects
//! - [`storage`]: JSON file, key-value database and in-memory backends
//! - [`ProspectsScreen`]: filtered rows plus the scan, toggle, sort and remind actions
//! - [`notify`]: the permission-gated reminder flow and notification centres
//! - [`scan`]: scan payload parsing and scanner implementations

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod notify;
pub mod prospect;
pub mod scan;
pub mod screen;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::FilterType;
pub use logging::init_logging;
pub use notify::{NotificationCenter, ReminderOutcome, ReminderScheduler};
pub use prospect::{Prospect, ProspectId};
pub use screen::{ProspectRow, ProspectsScreen};
pub use storage::ProspectStorage;
pub use store::{ProspectStore, StoreChange, SubscriptionId};
