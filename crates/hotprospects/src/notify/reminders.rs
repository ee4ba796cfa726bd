//! Permission-gated reminder scheduling.
//!
//! Scheduling a reminder first checks permission:
//!
//! | status          | action                                              |
//! |-----------------|-----------------------------------------------------|
//! | `Authorized`    | schedule                                            |
//! | `NotDetermined` | ask; schedule if granted, otherwise give up         |
//! | `Denied`        | give up                                             |
//!
//! Giving up is not an error: it is logged and reported as
//! [`ReminderOutcome::Denied`].
//!
//! Each reminder gets a fresh identifier that is not derived from the
//! prospect, so reminders cannot be looked up or cancelled per prospect.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::prospect::Prospect;

use super::{
    AuthorizationOptions, AuthorizationStatus, NotificationCenter, NotificationContent,
    NotificationRequest, ReminderTrigger,
};

/// What happened when a reminder was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// The reminder was handed to the centre under this identifier.
    Scheduled(Uuid),
    /// Permission is not available; nothing was scheduled.
    Denied,
}

/// Builds reminder requests and runs the permission flow.
#[derive(Clone)]
pub struct ReminderScheduler {
    center: Arc<dyn NotificationCenter>,
    trigger: ReminderTrigger,
    sound: bool,
}

impl ReminderScheduler {
    /// Scheduler using `trigger` for every reminder.
    #[must_use]
    pub fn new(center: Arc<dyn NotificationCenter>, trigger: ReminderTrigger) -> Self {
        Self {
            center,
            trigger,
            sound: true,
        }
    }

    /// Turn the default sound on or off.
    #[must_use]
    pub fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    /// The request that would be scheduled for `prospect`.
    #[must_use]
    pub fn request_for(&self, prospect: &Prospect) -> NotificationRequest {
        NotificationRequest {
            identifier: Uuid::new_v4(),
            content: NotificationContent {
                title: format!("Contact {}", prospect.name),
                subtitle: prospect.email_address.clone(),
                sound: self.sound,
            },
            trigger: self.trigger,
        }
    }

    /// Schedule a follow-up reminder for `prospect`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the centre itself fails. A refused or
    /// previously denied permission yields `Ok(ReminderOutcome::Denied)`.
    pub async fn schedule(&self, prospect: &Prospect) -> Result<ReminderOutcome> {
        let status = self.center.authorization_status().await?;
        debug!("Notification permission is {status}");

        let allowed = match status {
            AuthorizationStatus::Authorized => true,
            // Ask once; the centre records the answer
            AuthorizationStatus::NotDetermined => {
                self.center
                    .request_authorization(AuthorizationOptions::all())
                    .await?
            }
            AuthorizationStatus::Denied => false,
        };

        if !allowed {
            warn!(
                "Notifications not permitted; no reminder for prospect {}",
                prospect.id()
            );
            return Ok(ReminderOutcome::Denied);
        }

        let request = self.request_for(prospect);
        let identifier = request.identifier;
        self.center.add(request).await?;
        info!(
            "Scheduled reminder {identifier} for prospect {}",
            prospect.id()
        );
        Ok(ReminderOutcome::Scheduled(identifier))
    }
}

impl fmt::Debug for ReminderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReminderScheduler")
            .field("trigger", &self.trigger)
            .field("sound", &self.sound)
            .finish_non_exhaustive()
    }
}
