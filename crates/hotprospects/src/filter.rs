//! View filters over the prospect list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::prospect::Prospect;

/// Which prospects a screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Every prospect.
    #[default]
    Everyone,
    /// Prospects already followed up.
    Contacted,
    /// Prospects still to follow up.
    Uncontacted,
}

impl FilterType {
    /// Screen title for this filter.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Everyone => "Everyone",
            Self::Contacted => "Contacted people",
            Self::Uncontacted => "Uncontacted people",
        }
    }

    /// Whether `prospect` is shown under this filter.
    #[must_use]
    pub fn matches(self, prospect: &Prospect) -> bool {
        match self {
            Self::Everyone => true,
            Self::Contacted => prospect.is_contacted(),
            Self::Uncontacted => !prospect.is_contacted(),
        }
    }

    /// The prospects shown under this filter, preserving order.
    #[must_use]
    pub fn apply(self, people: &[Prospect]) -> Vec<&Prospect> {
        people.iter().filter(|p| self.matches(p)).collect()
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Everyone => write!(f, "everyone"),
            Self::Contacted => write!(f, "contacted"),
            Self::Uncontacted => write!(f, "uncontacted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::prospect::ProspectId;

    fn sample() -> Vec<Prospect> {
        let mut people: Vec<Prospect> = (0..6)
            .map(|i| Prospect::new(format!("P{i}"), String::new()))
            .collect();
        for p in people.iter_mut().step_by(2) {
            p.toggle_contacted();
        }
        people
    }

    fn ids(people: &[&Prospect]) -> HashSet<ProspectId> {
        people.iter().map(|p| p.id()).collect()
    }

    #[test]
    fn test_titles() {
        assert_eq!(FilterType::Everyone.title(), "Everyone");
        assert_eq!(FilterType::Contacted.title(), "Contacted people");
        assert_eq!(FilterType::Uncontacted.title(), "Uncontacted people");
    }

    #[test]
    fn test_everyone_is_identity() {
        let people = sample();
        let shown = FilterType::Everyone.apply(&people);
        assert_eq!(shown.len(), people.len());
        assert!(shown.iter().zip(&people).all(|(a, b)| a.id() == b.id()));
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let people = sample();
        let contacted = ids(&FilterType::Contacted.apply(&people));
        let uncontacted = ids(&FilterType::Uncontacted.apply(&people));
        let everyone = ids(&FilterType::Everyone.apply(&people));

        assert!(contacted.is_disjoint(&uncontacted));
        let union: HashSet<ProspectId> = contacted.union(&uncontacted).copied().collect();
        assert_eq!(union, everyone);
    }

    #[test]
    fn test_filters_preserve_order() {
        let people = sample();
        let names: Vec<&str> = FilterType::Contacted
            .apply(&people)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["P0", "P2", "P4"]);
    }

    #[test]
    fn test_empty_list() {
        for filter in [FilterType::Everyone, FilterType::Contacted, FilterType::Uncontacted] {
            assert!(filter.apply(&[]).is_empty());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterType::Uncontacted.to_string(), "uncontacted");
        assert_eq!(FilterType::default(), FilterType::Everyone);
    }
}
