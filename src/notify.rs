//! Transient, auto-dismissing user notifications.
//!
//! Every API outcome except a list refresh raises one of these. They expire
//! a fixed time after being raised; expiry is evaluated lazily whenever the
//! active set is read, so no timer task is needed.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

/// How long a notification stays visible.
pub const NOTIFICATION_DURATION_SECS: i64 = 3;

pub mod titles {
    pub const LOGIN_SUCCESS: &str = "Login Successful";
    pub const LOGIN_FAILED: &str = "Login Failed";
    pub const LOGIN_FAILED_DETAIL: &str = "Invalid username or password";
    pub const REGISTER_SUCCESS: &str = "Registration Successful";
    pub const REGISTER_FAILED: &str = "Registration Failed";
    pub const REGISTER_FAILED_DETAIL: &str = "Please try again";
    pub const PROMPT_CREATED: &str = "Prompt Created";
    pub const PROMPT_CREATE_FAILED: &str = "Failed to Create Prompt";
    pub const PROMPT_UPDATED: &str = "Prompt Updated";
    pub const PROMPT_UPDATE_FAILED: &str = "Failed to Update Prompt";
    pub const PROMPT_DELETED: &str = "Prompt Deleted";
    pub const PROMPT_DELETE_FAILED: &str = "Failed to Delete Prompt";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub status: NotificationStatus,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            status: NotificationStatus::Success,
            raised_at: Utc::now(),
        }
    }

    pub fn error(title: &str, description: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            description: description.map(str::to_string),
            status: NotificationStatus::Error,
            raised_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.raised_at + Duration::seconds(NOTIFICATION_DURATION_SECS)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }
}

/// Shared queue of raised notifications. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "notification raised");
        self.queue.lock().await.push_back(notification);
    }

    /// Notifications still visible at `now`, oldest first. Expired ones are
    /// dropped for good.
    pub async fn active(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let mut queue = self.queue.lock().await;
        queue.retain(|n| n.is_active(now));
        queue.iter().cloned().collect()
    }

    /// Take everything raised so far regardless of expiry.
    pub async fn drain(&self) -> Vec<Notification> {
        self.queue.lock().await.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_after_three_seconds() {
        let n = Notification::success(titles::PROMPT_CREATED);
        assert!(n.is_active(n.raised_at));
        assert!(n.is_active(n.raised_at + Duration::milliseconds(2999)));
        assert!(!n.is_active(n.raised_at + Duration::seconds(3)));
    }

    #[test]
    fn test_error_carries_description() {
        let n = Notification::error(titles::LOGIN_FAILED, Some(titles::LOGIN_FAILED_DETAIL));
        assert_eq!(n.status, NotificationStatus::Error);
        assert_eq!(n.description.as_deref(), Some("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_active_prunes_expired() {
        let center = NotificationCenter::new();
        let mut old = Notification::success(titles::PROMPT_DELETED);
        old.raised_at = Utc::now() - Duration::seconds(10);
        center.push(old).await;
        center.push(Notification::success(titles::PROMPT_CREATED)).await;

        let active = center.active(Utc::now()).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Prompt Created");
        assert_eq!(center.drain().await.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_queue() {
        let center = NotificationCenter::new();
        let handle = center.clone();
        handle.push(Notification::success(titles::LOGIN_SUCCESS)).await;

        let drained = center.drain().await;
        assert_eq!(drained.len(), 1);
        assert!(handle.drain().await.is_empty());
    }
}
