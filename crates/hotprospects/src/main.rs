//! `prospects` - CLI for hotprospects
//!
//! This binary lists, scans, toggles and reminds about prospects stored in
//! the local data directory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use hotprospects::cli::{
    Cli, Command, ConfigCommand, ListCommand, NotificationsCommand, RemindCommand,
    RemindersCommand, ScanCommand,
};
use hotprospects::notify::{LocalNotificationCenter, NotificationCenter};
use hotprospects::scan::{CodeScanner, ReaderScanner, SimulatedScanner};
use hotprospects::{
    init_logging, storage, Config, ProspectStore, ProspectsScreen, ReminderOutcome,
    ReminderScheduler,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Scan(cmd) => handle_scan(&config, &cmd),
        Command::Toggle(cmd) => handle_toggle(&config, cmd.id),
        Command::Remind(cmd) => handle_remind(&config, &cmd).await,
        Command::Reminders(cmd) => handle_reminders(&config, &cmd).await,
        Command::Notifications(cmd) => handle_notifications(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

// Never fails: unreadable saved data is logged and the store starts empty.
fn open_store(config: &Config) -> ProspectStore {
    ProspectStore::load(storage::open(config))
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut store = open_store(config);
    let screen = ProspectsScreen::new(cmd.filter.into());

    if cmd.sort_by_name {
        screen.sort_by_name(&mut store);
    }

    let rows = screen.rows(&store);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", screen.title());
    println!("{}", "-".repeat(screen.title().len()));
    if rows.is_empty() {
        println!("No prospects.");
    }
    for row in &rows {
        println!("{} {}  <{}>", row.marker(), row.name, row.email_address);
        println!("    id: {}", row.id);
    }
    Ok(())
}

fn handle_scan(config: &Config, cmd: &ScanCommand) -> anyhow::Result<()> {
    let mut store = open_store(config);
    let screen = ProspectsScreen::default();

    // An explicit payload wins, then the samples, then whatever is piped in
    let result = if let Some(payload) = &cmd.payload {
        Ok(payload.clone())
    } else if cmd.simulate {
        SimulatedScanner::new(cmd.sample).scan()
    } else {
        ReaderScanner::new(io::stdin().lock()).scan()
    };

    match screen.handle_scan(&mut store, result) {
        Some(id) => {
            if let Some(prospect) = store.get(id) {
                println!("Added {} <{}>", prospect.name, prospect.email_address);
            }
            println!("{id}");
        }
        None => println!("Nothing added."),
    }
    Ok(())
}

fn handle_toggle(config: &Config, id: hotprospects::ProspectId) -> anyhow::Result<()> {
    let mut store = open_store(config);
    let screen = ProspectsScreen::default();

    if !screen.toggle(&mut store, id) {
        anyhow::bail!("no prospect with id {id}");
    }

    if let Some(prospect) = store.get(id) {
        let state = if prospect.is_contacted() {
            "contacted"
        } else {
            "uncontacted"
        };
        println!("{} is now {state}.", prospect.name);
    }
    Ok(())
}

async fn handle_remind(config: &Config, cmd: &RemindCommand) -> anyhow::Result<()> {
    let store = open_store(config);
    // `--yes` answers the permission prompt up front
    let yes = cmd.yes;
    let center = LocalNotificationCenter::new(config.notifications_path())
        .with_prompt(move |_| yes || ask("Allow hotprospects to show reminders?"));
    let center: Arc<dyn NotificationCenter> = Arc::new(center);
    let reminders = ReminderScheduler::new(center, config.reminder_trigger())
        .with_sound(config.reminders.sound);

    match ProspectsScreen::default()
        .remind(&store, &reminders, cmd.id)
        .await
    {
        Some(ReminderOutcome::Scheduled(identifier)) => {
            println!("Reminder scheduled ({identifier}).");
        }
        Some(ReminderOutcome::Denied) => {
            println!("Notifications are not allowed; no reminder scheduled.");
        }
        None => anyhow::bail!("could not schedule a reminder for {}", cmd.id),
    }
    Ok(())
}

async fn handle_reminders(config: &Config, cmd: &RemindersCommand) -> anyhow::Result<()> {
    let center = LocalNotificationCenter::new(config.notifications_path());

    // Prune first so the listing below only shows what is left
    if cmd.clear_delivered {
        let removed = center.clear_delivered()?;
        if !cmd.json {
            println!("Cleared {removed} delivered reminder(s).");
        }
    }

    let pending = center.pending().await?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("No reminders.");
    }
    let now = Utc::now();
    for reminder in &pending {
        let state = if reminder.is_due(now) { "due" } else { "pending" };
        println!(
            "{}  {}  {}  [{state}]",
            reminder.fire_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
            reminder.request.content.title,
            reminder.request.content.subtitle,
        );
    }
    Ok(())
}

async fn handle_notifications(
    config: &Config,
    cmd: &NotificationsCommand,
) -> anyhow::Result<()> {
    let center = LocalNotificationCenter::new(config.notifications_path());

    if let Some(status) = cmd.target_status() {
        center.set_authorization(status)?;
    }
    println!("Notifications: {}", center.authorization_status().await?);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", config.storage.backend);
                println!("  Data directory:     {}", config.data_dir().display());
                println!(
                    "  Prospects file:     {}",
                    config.prospects_file_path().display()
                );
                println!("  Database:           {}", config.database_path().display());
                println!("  Save key:           {}", config.storage.save_key);
                println!();
                println!("[Reminders]");
                println!("  Delay (seconds):    {}", config.reminders.delay_secs);
                match config.reminders.hour {
                    Some(hour) => println!("  Daily at hour:      {hour}"),
                    None => println!("  Daily at hour:      off"),
                }
                println!("  Sound:              {}", config.reminders.sound);
                println!();
                println!("[Notifications]");
                println!(
                    "  State file:         {}",
                    config.notifications_path().display()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn ask(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
