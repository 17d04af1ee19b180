//! Conversation model for the chat widget.

use serde::{Deserialize, Serialize};

/// Text shown when the bot's reply carries no response.
pub const FALLBACK_REPLY: &str = "Sorry, I didn't understand that.";

/// Intent label used when the service reports none.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Bot entry appended when the reply request fails.
pub const SERVER_ERROR_NOTICE: &str = "Server error. Is the backend running?";

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    /// Label used when rendering a transcript line.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Bot => "Bot",
        }
    }
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

impl ConversationEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            intent: None,
        }
    }

    pub fn bot(text: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
            intent: Some(intent.into()),
        }
    }

    /// Bot entry standing in for a failed reply.
    pub fn server_error() -> Self {
        Self {
            speaker: Speaker::Bot,
            text: SERVER_ERROR_NOTICE.to_string(),
            intent: None,
        }
    }
}

/// A bot reply as decoded from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BotReply {
    pub response: Option<String>,
    pub intent: Option<String>,
}

impl BotReply {
    /// Converts the reply into a transcript entry, filling in fallbacks.
    pub fn into_entry(self) -> ConversationEntry {
        let text = self
            .response
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());
        let intent = self
            .intent
            .filter(|intent| !intent.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_INTENT.to_string());
        ConversationEntry::bot(text, intent)
    }
}
