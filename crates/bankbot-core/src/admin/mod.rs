//! Admin dashboard records.
//!
//! Training records are owned by the remote service; the client only ever
//! holds a read-through copy. History records are read-only.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BankbotError, Result};

/// Server-assigned identifier of a training record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingRecordId(pub i64);

impl fmt::Display for TrainingRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One NLU training example as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub id: TrainingRecordId,
    pub text: String,
    pub bot_reply: String,
    pub intent: String,
}

/// A training record that has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDraft {
    pub text: String,
    pub bot_reply: String,
    pub intent: String,
}

impl TrainingDraft {
    pub fn new(
        text: impl Into<String>,
        bot_reply: impl Into<String>,
        intent: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            bot_reply: bot_reply.into(),
            intent: intent.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty()
            || self.bot_reply.trim().is_empty()
            || self.intent.trim().is_empty()
        {
            return Err(BankbotError::validation(
                "Query, bot reply and intent are all required.",
            ));
        }
        Ok(())
    }
}

/// One logged chat query as reported by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub query: String,
    pub intent: String,
    /// Classifier confidence in `[0, 1]`
    pub confidence: f64,
    pub timestamp: String,
}

impl HistoryRecord {
    /// Confidence rendered as a percentage, e.g. `87.5%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}
