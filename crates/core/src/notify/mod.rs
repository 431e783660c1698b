//! User-visible notification side channel.
//!
//! Absorbed provider failures still need to reach the user (a toast, a
//! banner, whatever the rendering layer does with them). Components emit
//! [`Notice`]s through a [`NotificationHandle`]; the rendering layer drains
//! the receiving end.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Handle for emitting notices.
///
/// Cheaply cloneable and shareable across tasks. Emitting never fails the
/// caller: if the channel is full or closed the notice is logged and dropped,
/// because a missing toast must not break the state machine behind it.
#[derive(Clone)]
pub struct NotificationHandle {
    tx: mpsc::Sender<Notice>,
}

impl NotificationHandle {
    /// Create a handle together with the receiving end the UI drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Emit a notice asynchronously.
    pub async fn emit(&self, notice: Notice) {
        if let Err(e) = self.tx.send(notice).await {
            tracing::error!("Failed to emit notice: {}", e);
        }
    }

    /// Emit a notice without blocking.
    ///
    /// Returns true if the notice was enqueued.
    pub fn try_emit(&self, notice: Notice) -> bool {
        match self.tx.try_send(notice) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to emit notice: {}", e);
                false
            }
        }
    }
}
