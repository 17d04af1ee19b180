use std::sync::Arc;

use bankbot_core::api::BankApi;
use bankbot_core::chat::ConversationEntry;
use tokio::sync::RwLock;

/// Transcript of one interactive conversation with the bot.
///
/// Append-only and never persisted. A user entry is always appended before
/// the bot entry answering it. Concurrent `send` calls append their bot
/// entries in reply-arrival order, so replies may interleave.
pub struct ChatSession {
    api: Arc<dyn BankApi>,
    transcript: RwLock<Vec<ConversationEntry>>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn BankApi>) -> Self {
        Self {
            api,
            transcript: RwLock::new(Vec::new()),
        }
    }

    /// Sends a message and appends the exchange to the transcript.
    ///
    /// Blank input is ignored and `None` is returned. A failed request
    /// yields a server-error bot entry instead of an error.
    pub async fn send(&self, text: &str) -> Option<ConversationEntry> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript
            .write()
            .await
            .push(ConversationEntry::user(text));

        let entry = match self.api.chat(text).await {
            Ok(reply) => reply.into_entry(),
            Err(e) => {
                tracing::warn!("[ChatSession] Chat request failed: {}", e);
                ConversationEntry::server_error()
            }
        };

        self.transcript.write().await.push(entry.clone());
        Some(entry)
    }

    pub async fn transcript(&self) -> Vec<ConversationEntry> {
        self.transcript.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.transcript.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transcript.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBankApi;
    use bankbot_core::chat::{SERVER_ERROR_NOTICE, Speaker};

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let api = Arc::new(MockBankApi::new());
        let chat = ChatSession::new(api.clone());

        assert!(chat.send("").await.is_none());
        assert!(chat.send("   ").await.is_none());
        assert!(chat.is_empty().await);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_user_entry_precedes_single_bot_entry() {
        let chat = ChatSession::new(Arc::new(MockBankApi::new()));

        let reply = chat.send("hello").await.unwrap();

        let transcript = chat.transcript().await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0], ConversationEntry::user("hello"));
        assert_eq!(transcript[1], reply);
        assert_eq!(reply.speaker, Speaker::Bot);
        assert_eq!(reply.intent.as_deref(), Some("echo"));
    }

    #[tokio::test]
    async fn test_failed_request_appends_error_entry() {
        let api = Arc::new(MockBankApi::new());
        api.set_offline(true);
        let chat = ChatSession::new(api);

        let reply = chat.send("balance?").await.unwrap();

        assert_eq!(reply.text, SERVER_ERROR_NOTICE);
        assert_eq!(reply.intent, None);
        assert_eq!(chat.len().await, 2);
    }
}
