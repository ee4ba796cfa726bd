//! The prospect record.
//!
//! A prospect is a person met while networking. Records are created from a
//! scanned QR payload, carry a generated identifier that never changes, and
//! are serialized in the JSON shape shared by every storage backend:
//!
//! ```json
//! { "id": "…uuid…", "name": "Ada", "emailAddress": "ada@example.com", "isContacted": false }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder name for prospects created without one.
pub const DEFAULT_NAME: &str = "Anonymous";

/// Stable identifier of a prospect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProspectId(Uuid);

impl ProspectId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProspectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProspectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A networking contact.
///
/// `is_contacted` has no public setter: it only changes through
/// [`ProspectStore::toggle`](crate::store::ProspectStore::toggle) so that every
/// change is observed and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    id: ProspectId,
    /// Display name.
    pub name: String,
    /// Email address, stored as entered.
    pub email_address: String,
    is_contacted: bool,
}

impl Prospect {
    /// Create an uncontacted prospect with a new identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            id: ProspectId::new(),
            name: name.into(),
            email_address: email_address.into(),
            is_contacted: false,
        }
    }

    /// The identifier assigned at creation.
    #[must_use]
    pub fn id(&self) -> ProspectId {
        self.id
    }

    /// Whether this prospect has been followed up.
    #[must_use]
    pub fn is_contacted(&self) -> bool {
        self.is_contacted
    }

    pub(crate) fn toggle_contacted(&mut self) {
        self.is_contacted = !self.is_contacted;
    }
}

impl Default for Prospect {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prospect() {
        let prospect = Prospect::default();
        assert_eq!(prospect.name, "Anonymous");
        assert!(prospect.email_address.is_empty());
        assert!(!prospect.is_contacted());
    }

    #[test]
    fn test_new_prospects_get_distinct_ids() {
        let a = Prospect::new("Ada", "ada@example.com");
        let b = Prospect::new("Ada", "ada@example.com");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_toggle_contacted() {
        let mut prospect = Prospect::new("Ada", "ada@example.com");
        prospect.toggle_contacted();
        assert!(prospect.is_contacted());
        prospect.toggle_contacted();
        assert!(!prospect.is_contacted());
    }

    #[test]
    fn test_json_field_names() {
        let prospect = Prospect::new("Ada Lovelace", "ada@example.com");
        let value = serde_json::to_value(&prospect).unwrap();

        assert_eq!(value["id"], prospect.id().to_string());
        assert_eq!(value["name"], "Ada Lovelace");
        assert_eq!(value["emailAddress"], "ada@example.com");
        assert_eq!(value["isContacted"], false);
    }

    #[test]
    fn test_deserialize_saved_record() {
        let json = r#"{
            "id": "5c1c4c43-3f0a-4f57-9a63-0a7f2c1b9f11",
            "name": "Grace Hopper",
            "emailAddress": "grace@example.com",
            "isContacted": true
        }"#;
        let prospect: Prospect = serde_json::from_str(json).unwrap();

        assert_eq!(
            prospect.id().to_string(),
            "5c1c4c43-3f0a-4f57-9a63-0a7f2c1b9f11"
        );
        assert_eq!(prospect.name, "Grace Hopper");
        assert!(prospect.is_contacted());
    }

    #[test]
    fn test_deserialize_rejects_missing_fields() {
        let json = r#"{"name": "No Id"}"#;
        assert!(serde_json::from_str::<Prospect>(json).is_err());
    }

    #[test]
    fn test_prospect_id_parse() {
        let id = ProspectId::new();
        let parsed: ProspectId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<ProspectId>().is_err());
    }
}
