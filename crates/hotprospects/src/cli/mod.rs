//! Command-line interface for hotprospects.
//!
//! This module provides the CLI structure for the `prospects` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FilterArg, ListCommand, NotificationsCommand, RemindCommand,
    RemindersCommand, ScanCommand, ToggleCommand,
};

/// prospects - Keep track of the people you meet
///
/// Scan contact QR codes, mark people as contacted, and get reminded to
/// follow up.
#[derive(Debug, Parser)]
#[command(name = "prospects")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List prospects
    List(ListCommand),

    /// Scan a contact code and add the prospect
    Scan(ScanCommand),

    /// Mark a prospect contacted or uncontacted
    Toggle(ToggleCommand),

    /// Schedule a follow-up reminder for a prospect
    Remind(RemindCommand),

    /// Show scheduled reminders
    Reminders(RemindersCommand),

    /// View or change notification permission
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
