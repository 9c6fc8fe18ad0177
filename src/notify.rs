use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success<T: Into<String>, D: Into<String>>(title: T, description: D) -> Self {
        Self::new(NotificationLevel::Success, title.into(), description.into())
    }

    pub fn failure<T: Into<String>, D: Into<String>>(title: T, description: D) -> Self {
        Self::new(NotificationLevel::Failure, title.into(), description.into())
    }

    fn new(level: NotificationLevel, title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            title,
            description,
            created_at: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.level == NotificationLevel::Failure
    }
}

/// Renders notifications. Queuing and display timing belong to the implementor.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Maps a failed operation to its notification.
///
/// Precondition failures carry their own title and hint; remote failures use
/// the server's `error` text, everything else falls back to `fallback`.
pub fn failure_notification(error: &AppError, fallback: &str) -> Notification {
    match error {
        AppError::Validation { reason, hint } | AppError::State { reason, hint } => {
            Notification::failure(sentence_case(reason), *hint)
        }
        AppError::Remote {
            message: Some(message),
            ..
        } => Notification::failure("Error", message.clone()),
        _ => Notification::failure("Error", fallback),
    }
}

fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            NotificationLevel::Failure => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    notifications: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    pub fn len(&self) -> usize {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
