//! Notification centre with scripted permission answers.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::error::{Error, Result};

use super::{
    AuthorizationOptions, AuthorizationStatus, NotificationCenter, NotificationRequest,
    ScheduledNotification,
};

#[derive(Debug)]
struct CenterState {
    status: AuthorizationStatus,
    grant_on_request: bool,
    authorization_requests: usize,
    scheduled: Vec<ScheduledNotification>,
}

/// Keeps everything in memory and answers permission requests with a
/// preset response.
#[derive(Debug)]
pub struct InMemoryNotificationCenter {
    state: Mutex<CenterState>,
}

impl InMemoryNotificationCenter {
    /// Centre starting in `status` that grants permission when asked.
    #[must_use]
    pub fn new(status: AuthorizationStatus) -> Self {
        Self {
            state: Mutex::new(CenterState {
                status,
                grant_on_request: true,
                authorization_requests: 0,
                scheduled: Vec::new(),
            }),
        }
    }

    /// Set how the simulated user answers a permission request.
    #[must_use]
    pub fn with_grant_on_request(self, grant: bool) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.grant_on_request = grant;
        }
        self
    }

    /// How many times permission has been requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn authorization_requests(&self) -> Result<usize> {
        Ok(self.lock()?.authorization_requests)
    }

    /// Notifications scheduled so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn scheduled(&self) -> Result<Vec<ScheduledNotification>> {
        Ok(self.lock()?.scheduled.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CenterState>> {
        self.state
            .lock()
            .map_err(|_| Error::internal("notification centre state lock poisoned"))
    }
}

impl Default for InMemoryNotificationCenter {
    fn default() -> Self {
        Self::new(AuthorizationStatus::NotDetermined)
    }
}

#[async_trait::async_trait]
impl NotificationCenter for InMemoryNotificationCenter {
    async fn authorization_status(&self) -> Result<AuthorizationStatus> {
        Ok(self.lock()?.status)
    }

    async fn request_authorization(&self, _options: AuthorizationOptions) -> Result<bool> {
        let mut state = self.lock()?;
        state.authorization_requests += 1;
        let granted = state.grant_on_request;
        state.status = if granted {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        Ok(granted)
    }

    async fn add(&self, request: NotificationRequest) -> Result<()> {
        let scheduled = ScheduledNotification::accept(request, Utc::now())?;
        self.lock()?.scheduled.push(scheduled);
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<ScheduledNotification>> {
        self.scheduled()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::notify::{NotificationContent, ReminderTrigger};

    fn request() -> NotificationRequest {
        NotificationRequest {
            identifier: Uuid::new_v4(),
            content: NotificationContent {
                title: "Contact Ada".to_string(),
                subtitle: "ada@example.com".to_string(),
                sound: true,
            },
            trigger: ReminderTrigger::TimeInterval {
                seconds: 5,
                repeats: false,
            },
        }
    }

    #[tokio::test]
    async fn test_request_grants_by_default() {
        let center = InMemoryNotificationCenter::default();
        assert_eq!(
            center.authorization_status().await.unwrap(),
            AuthorizationStatus::NotDetermined
        );

        assert!(center
            .request_authorization(AuthorizationOptions::all())
            .await
            .unwrap());
        assert_eq!(
            center.authorization_status().await.unwrap(),
            AuthorizationStatus::Authorized
        );
        assert_eq!(center.authorization_requests().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_request_can_be_refused() {
        let center = InMemoryNotificationCenter::default().with_grant_on_request(false);

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
    async fn test_add_records_request() {
        let center = InMemoryNotificationCenter::new(AuthorizationStatus::Authorized);
        let request = request();
        center.add(request.clone()).await.unwrap();

        let pending = center.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].request, request);
    }
}
