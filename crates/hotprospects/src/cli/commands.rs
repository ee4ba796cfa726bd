//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::FilterType;
use crate::notify::AuthorizationStatus;
use crate::prospect::ProspectId;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Which prospects to show
    #[arg(short, long, value_enum, default_value = "everyone")]
    pub filter: FilterArg,

    /// Sort by name before listing (the order is not saved)
    #[arg(short, long)]
    pub sort_by_name: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Scan command arguments.
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Use this text as the decoded code instead of reading stdin
    #[arg(short, long, conflicts_with = "simulate")]
    pub payload: Option<String>,

    /// Use a built-in sample code
    #[arg(long)]
    pub simulate: bool,

    /// Which sample to start from when simulating
    #[arg(long, default_value = "0", requires = "simulate")]
    pub sample: usize,
}

/// Toggle command arguments.
#[derive(Debug, Args)]
pub struct ToggleCommand {
    /// Identifier of the prospect
    pub id: ProspectId,
}

/// Remind command arguments.
#[derive(Debug, Args)]
pub struct RemindCommand {
    /// Identifier of the prospect
    pub id: ProspectId,

    /// Grant notification permission without prompting if asked
    #[arg(short, long)]
    pub yes: bool,
}

/// Reminders command arguments.
#[derive(Debug, Args)]
pub struct RemindersCommand {
    /// Remove reminders whose delivery time has passed
    #[arg(long)]
    pub clear_delivered: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Notification permission commands.
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// Show the current permission state
    Status,

    /// Allow notifications
    Allow,

    /// Deny notifications
    Deny,

    /// Forget the answer so the next reminder asks again
    Reset,
}

impl NotificationsCommand {
    /// The permission state this command sets, if any.
    #[must_use]
    pub fn target_status(&self) -> Option<AuthorizationStatus> {
        match self {
            Self::Status => None,
            Self::Allow => Some(AuthorizationStatus::Authorized),
            Self::Deny => Some(AuthorizationStatus::Denied),
            Self::Reset => Some(AuthorizationStatus::NotDetermined),
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterArg {
    /// Every prospect
    #[default]
    Everyone,
    /// Contacted prospects only
    Contacted,
    /// Uncontacted prospects only
    Uncontacted,
}

impl From<FilterArg> for FilterType {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Everyone => Self::Everyone,
            FilterArg::Contacted => Self::Contacted,
            FilterArg::Uncontacted => Self::Uncontacted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_arg_conversion() {
        assert_eq!(FilterType::from(FilterArg::Everyone), FilterType::Everyone);
        assert_eq!(FilterType::from(FilterArg::Contacted), FilterType::Contacted);
        assert_eq!(
            FilterType::from(FilterArg::Uncontacted),
            FilterType::Uncontacted
        );
    }

    #[test]
    fn test_filter_arg_default() {
        assert_eq!(FilterArg::default(), FilterArg::Everyone);
    }

    #[test]
    fn test_notifications_target_status() {
        assert_eq!(NotificationsCommand::Status.target_status(), None);
        assert_eq!(
            NotificationsCommand::Allow.target_status(),
            Some(AuthorizationStatus::Authorized)
        );
        assert_eq!(
            NotificationsCommand::Deny.target_status(),
            Some(AuthorizationStatus::Denied)
        );
        assert_eq!(
            NotificationsCommand::Reset.target_status(),
            Some(AuthorizationStatus::NotDetermined)
        );
    }
}
