//! File-backed notification centre.
//!
//! Permission state and accepted requests are kept in one JSON document so
//! they survive between CLI invocations. Permission requests are answered by
//! a prompt callback (the CLI asks on the terminal).

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{
    AuthorizationOptions, AuthorizationStatus, NotificationCenter, NotificationRequest,
    ScheduledNotification,
};

type Prompt = Box<dyn Fn(AuthorizationOptions) -> bool + Send + Sync>;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CenterState {
    authorization: AuthorizationStatus,
    pending: Vec<ScheduledNotification>,
}

/// Notification centre persisted to a JSON file.
pub struct LocalNotificationCenter {
    path: PathBuf,
    prompt: Prompt,
    // Serializes read-modify-write cycles on the state file.
    guard: Mutex<()>,
}

impl LocalNotificationCenter {
    /// Centre stored at `path` that refuses permission when asked.
    ///
    /// Use [`with_prompt`](Self::with_prompt) to actually ask someone.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prompt: Box::new(|_| false),
            guard: Mutex::new(()),
        }
    }

    /// Answer permission requests with `prompt`.
    #[must_use]
    pub fn with_prompt(
        mut self,
        prompt: impl Fn(AuthorizationOptions) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    /// Path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the stored permission state, as a settings screen would.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be read or written.
    pub fn set_authorization(&self, status: AuthorizationStatus) -> Result<()> {
        let _guard = self.lock()?;
        let mut state = self.read_state()?;
        state.authorization = status;
        self.write_state(&state)?;
        info!("Notification permission set to {status}");
        Ok(())
    }

    /// Drop pending notifications whose delivery time has passed.
    /// Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be read or written.
    pub fn clear_delivered(&self) -> Result<usize> {
        let _guard = self.lock()?;
        let mut state = self.read_state()?;
        let now = Utc::now();
        let before = state.pending.len();
        state.pending.retain(|n| !n.is_due(now));
        let removed = before - state.pending.len();
        if removed > 0 {
            self.write_state(&state)?;
        }
        Ok(removed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| Error::internal("notification centre lock poisoned"))
    }

    fn read_state(&self) -> Result<CenterState> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            // Fresh install: nothing asked, nothing pending
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CenterState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_state(&self, state: &CenterState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        // Same temp-then-rename write as the prospects file
        let bytes = serde_json::to_vec_pretty(state)?;
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, bytes)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl fmt::Debug for LocalNotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalNotificationCenter")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl NotificationCenter for LocalNotificationCenter {
    async fn authorization_status(&self) -> Result<AuthorizationStatus> {
        let _guard = self.lock()?;
        Ok(self.read_state()?.authorization)
    }

    async fn request_authorization(&self, options: AuthorizationOptions) -> Result<bool> {
        let _guard = self.lock()?;
        let mut state = self.read_state()?;
        // The answer is remembered, so later calls skip the prompt
        let granted = (self.prompt)(options);
        state.authorization = if granted {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        self.write_state(&state)?;
        debug!("Notification permission request answered: {granted}");
        Ok(granted)
    }

    async fn add(&self, request: NotificationRequest) -> Result<()> {
        let _guard = self.lock()?;
        let mut state = self.read_state()?;
        let scheduled = ScheduledNotification::accept(request, Utc::now())?;
        debug!(
            "Scheduling notification {} for {}",
            scheduled.request.identifier, scheduled.fire_at
        );
        state.pending.push(scheduled);
        self.write_state(&state)
    }

    async fn pending(&self) -> Result<Vec<ScheduledNotification>> {
        let _guard = self.lock()?;
        Ok(self.read_state()?.pending)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::notify::{NotificationContent, ReminderTrigger};

    fn request(seconds: u64) -> NotificationRequest {
        NotificationRequest {
            identifier: Uuid::new_v4(),
            content: NotificationContent {
                title: "Contact Ada".to_string(),
                subtitle: "ada@example.com".to_string(),
                sound: true,
            },
            trigger: ReminderTrigger::TimeInterval {
                seconds,
                repeats: false,
            },
        }
    }

    #[tokio::test]
    async fn test_fresh_centre_is_not_determined() {
        let dir = tempfile::tempdir().unwrap();
        let center = LocalNotificationCenter::new(dir.path().join("notifications.json"));

        assert_eq!(
            center.authorization_status().await.unwrap(),
            AuthorizationStatus::NotDetermined
        );
        assert!(center.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_prompt_refuses() {
        let dir = tempfile::tempdir().unwrap();
        let center = LocalNotificationCenter::new(dir.path().join("notifications.json"));

        assert!(!center
            .request_authorization(AuthorizationOptions::all())
            .await
            .unwrap());
        assert_eq!(
            center.authorization_status().await.unwrap(),
            AuthorizationStatus::Denied
        );
    }

    #[tokio::test]
    async fn test_prompt_answer_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.json");
        let center = LocalNotificationCenter::new(&path).with_prompt(|options| options.alert);

        assert!(center
            .request_authorization(AuthorizationOptions::all())
            .await
            .unwrap());

        let reopened = LocalNotificationCenter::new(&path);
        assert_eq!(
            reopened.authorization_status().await.unwrap(),
            AuthorizationStatus::Authorized
        );
    }

    #[tokio::test]
    async fn test_add_and_pending_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notifications.json");
        let center = LocalNotificationCenter::new(&path);
        let first = request(5);
        let second = request(60);

        center.add(first.clone()).await.unwrap();
        center.add(second.clone()).await.unwrap();

        let pending = LocalNotificationCenter::new(&path).pending().await.unwrap();
        let ids: Vec<Uuid> = pending.iter().map(|n| n.request.identifier).collect();
        assert_eq!(ids, vec![first.identifier, second.identifier]);
    }

    #[tokio::test]
    async fn test_set_authorization() {
        let dir = tempfile::tempdir().unwrap();
        let center = LocalNotificationCenter::new(dir.path().join("notifications.json"));

        center
            .set_authorization(AuthorizationStatus::Authorized)
            .unwrap();
        assert_eq!(
            center.authorization_status().await.unwrap(),
            AuthorizationStatus::Authorized
        );

        center
            .set_authorization(AuthorizationStatus::NotDetermined)
            .unwrap();
        assert_eq!(
            center.authorization_status().await.unwrap(),
            AuthorizationStatus::NotDetermined
        );
    }

    #[tokio::test]
    async fn test_clear_delivered_keeps_future_reminders() {
        let dir = tempfile::tempdir().unwrap();
        let center = LocalNotificationCenter::new(dir.path().join("notifications.json"));
        let later = request(3600);
        center.add(later.clone()).await.unwrap();

        assert_eq!(center.clear_delivered().unwrap(), 0);
        let pending = center.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].request, later);
    }

    #[tokio::test]
    async fn test_corrupt_state_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.json");
        std::fs::write(&path, "garbage").unwrap();

        let center = LocalNotificationCenter::new(&path);
        assert!(center.authorization_status().await.is_err());
    }

    #[test]
    fn test_debug_shows_path() {
        let center = LocalNotificationCenter::new("/tmp/notifications.json");
        assert!(format!("{center:?}").contains("/tmp/notifications.json"));
    }
}
