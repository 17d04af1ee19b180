//! Presentation seams.
//!
//! The application layer reports outcomes through [`Notifier`] and asks for
//! destructive-action consent through [`Confirmation`], so it never depends
//! on a particular front end.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A blocking, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Asks the user to confirm a destructive action.
pub trait Confirmation: Send + Sync {
    /// Returns `true` only when the user explicitly agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Fixed answer, e.g. for a `--yes` flag.
#[derive(Debug, Clone, Copy)]
pub struct Preconfirmed(pub bool);

impl Confirmation for Preconfirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
