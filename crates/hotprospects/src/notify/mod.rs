//! Local notification boundary.
//!
//! The app needs three things from a notification service: the current
//! permission state, a way to ask for permission, and a way to schedule a
//! one-shot alert. [`NotificationCenter`] captures exactly that. Two centres
//! are provided:
//! - [`LocalNotificationCenter`]: keeps permission state and pending alerts in
//!   a JSON file; used by the CLI
//! - [`InMemoryNotificationCenter`]: scripted permission answers; used in tests
//!
//! [`ReminderScheduler`] drives the permission flow on top of a centre.

pub mod local;
pub mod memory;
pub mod reminders;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

pub use local::LocalNotificationCenter;
pub use memory::InMemoryNotificationCenter;
pub use reminders::{ReminderOutcome, ReminderScheduler};

/// Whether the user allows notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    #[default]
    NotDetermined,
    /// The user refused.
    Denied,
    /// The user allowed notifications.
    Authorized,
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotDetermined => write!(f, "not_determined"),
            Self::Denied => write!(f, "denied"),
            Self::Authorized => write!(f, "authorized"),
        }
    }
}

/// Capabilities asked for when requesting permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationOptions {
    /// Show alerts.
    pub alert: bool,
    /// Badge the app.
    pub badge: bool,
    /// Play sounds.
    pub sound: bool,
}

impl AuthorizationOptions {
    /// Alerts, badges and sounds.
    #[must_use]
    pub fn all() -> Self {
        Self {
            alert: true,
            badge: true,
            sound: true,
        }
    }
}

/// What a notification shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    /// Headline.
    pub title: String,
    /// Secondary line.
    pub subtitle: String,
    /// Play the default sound.
    pub sound: bool,
}

/// When a notification fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReminderTrigger {
    /// A fixed delay after scheduling.
    TimeInterval {
        /// Delay in seconds.
        seconds: u64,
        /// Fire again every interval.
        repeats: bool,
    },
    /// The next time the local clock reaches `hour:00`.
    Calendar {
        /// Hour of day, 0-23.
        hour: u32,
        /// Fire again every day.
        repeats: bool,
    },
}

impl ReminderTrigger {
    /// First delivery time for a notification scheduled at `now`.
    ///
    /// Returns `None` if the time cannot be represented (an out-of-range
    /// hour, or an hour skipped by a daylight-saving change on both days).
    #[must_use]
    pub fn next_fire<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match *self {
            Self::TimeInterval { seconds, .. } => {
                let seconds = i64::try_from(seconds).ok()?;
                now.clone().checked_add_signed(Duration::try_seconds(seconds)?)
            }
            Self::Calendar { hour, .. } => {
                // Today at hour:00 if still ahead, otherwise tomorrow
                let tz = now.timezone();
                let today = now.date_naive().and_hms_opt(hour, 0, 0)?;
                let candidate = tz.from_local_datetime(&today).earliest();
                match candidate {
                    Some(at) if at > *now => Some(at),
                    _ => {
                        let tomorrow = today.checked_add_signed(Duration::days(1))?;
                        tz.from_local_datetime(&tomorrow).earliest()
                    }
                }
            }
        }
    }

    /// Whether the trigger fires more than once.
    #[must_use]
    pub fn repeats(&self) -> bool {
        match *self {
            Self::TimeInterval { repeats, .. } | Self::Calendar { repeats, .. } => repeats,
        }
    }
}

/// A request to schedule one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Identifier of this request, unrelated to any prospect id.
    pub identifier: Uuid,
    /// What to show.
    pub content: NotificationContent,
    /// When to show it.
    pub trigger: ReminderTrigger,
}

/// A request accepted by a centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    /// The accepted request.
    pub request: NotificationRequest,
    /// When the centre accepted it.
    pub scheduled_at: DateTime<Utc>,
    /// When it is due to fire.
    pub fire_at: DateTime<Utc>,
}

impl ScheduledNotification {
    /// Accept `request` at `now`, computing its delivery time in local time.
    ///
    /// # Errors
    ///
    /// Returns an error if the trigger has no representable delivery time.
    pub fn accept(request: NotificationRequest, now: DateTime<Utc>) -> Result<Self> {
        // Computed in local time so calendar triggers follow the wall clock
        let fire_at = request
            .trigger
            .next_fire(&now.with_timezone(&Local))
            .map(|at| at.with_timezone(&Utc))
            .ok_or_else(|| {
                crate::error::Error::notification(format!(
                    "cannot compute delivery time for {:?}",
                    request.trigger
                ))
            })?;
        Ok(Self {
            request,
            scheduled_at: now,
            fire_at,
        })
    }

    /// Whether delivery time has passed at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.fire_at <= now
    }
}

/// A service that can show local notifications.
#[async_trait::async_trait]
pub trait NotificationCenter: Send + Sync {
    /// Current permission state.
    async fn authorization_status(&self) -> Result<AuthorizationStatus>;

    /// Ask the user for permission. Resolves to whether it was granted.
    async fn request_authorization(&self, options: AuthorizationOptions) -> Result<bool>;

    /// Schedule a notification.
    async fn add(&self, request: NotificationRequest) -> Result<()>;

    /// Notifications scheduled so far, oldest first.
    async fn pending(&self) -> Result<Vec<ScheduledNotification>>;
}
