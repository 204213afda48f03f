//! Notification sink seam.
//!
//! The orchestrator emits one notification per completed review. Delivery is
//! an external collaborator's concern and is fire-and-forget from the
//! pipeline's perspective: a failing sink is logged and never fails the
//! review operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

use crate::types::UserId;

/// Severity bucket of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Success,
    Info,
    Warning,
}

/// A notification event destined for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub user: UserId,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
}

/// Delivery failure; observed by the orchestrator's log only.
#[derive(Debug, thiserror::Error)]
#[error("Notification delivery failed: {message}")]
pub struct NotifyError {
    pub message: String,
}

/// Abstract contract for notification delivery.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Default sink: writes the notification to the log and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            user = %notification.user,
            title = %notification.title,
            category = ?notification.category,
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// Capturing sink for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, in order.
    pub fn published(&self) -> Vec<Notification> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        self.published.lock().unwrap().push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        for (i, category) in [NotificationCategory::Info, NotificationCategory::Success]
            .iter()
            .enumerate()
        {
            sink.publish(Notification {
                user: UserId::new("u1"),
                title: format!("t{i}"),
                message: "m".into(),
                category: *category,
            })
            .await
            .unwrap();
        }

        let published = sink.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].title, "t0");
        assert_eq!(published[1].category, NotificationCategory::Success);
    }

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        let sink = LogSink;
        let result = sink
            .publish(Notification {
                user: UserId::new("u1"),
                title: "Review Completed".into(),
                message: "Your python code review scored 90/100.".into(),
                category: NotificationCategory::Success,
            })
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&NotificationCategory::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }
}
