//! Remote service contract.
//!
//! `BankApi` is the seam between the client-side state (sessions, tables,
//! transcripts) and the HTTP transport. Implementations own no session
//! state of their own beyond the transport's cookie jar.

use async_trait::async_trait;

use crate::admin::{HistoryRecord, TrainingDraft, TrainingRecord, TrainingRecordId};
use crate::chat::BotReply;
use crate::error::Result;
use crate::identity::{Credentials, Identity, Registration};
use crate::transaction::StatementLine;

/// Typed operations offered by the banking chatbot service.
///
/// Every method maps to exactly one HTTP request. Failures are reported
/// through [`crate::BankbotError`]: `Rejected` for `success: false`,
/// `Unauthorized` for 401/403 from protected endpoints, and the transport
/// family for everything else.
#[async_trait]
pub trait BankApi: Send + Sync {
    /// `POST /api/chat`
    async fn chat(&self, message: &str) -> Result<BotReply>;

    /// `POST /api/login`
    async fn login(&self, credentials: &Credentials) -> Result<Identity>;

    /// `POST /api/register`. Returns the server's confirmation message.
    async fn register(&self, registration: &Registration) -> Result<String>;

    /// `POST /api/logout`
    async fn logout(&self) -> Result<()>;

    /// `GET /api/profile`
    async fn profile(&self) -> Result<Identity>;

    /// `GET /api/mini_statement`
    async fn mini_statement(&self) -> Result<Vec<StatementLine>>;

    /// `POST /api/admin/login`. Returns the server's confirmation message.
    async fn admin_login(&self, credentials: &Credentials) -> Result<String>;

    /// `GET /api/admin/history`
    async fn chat_history(&self) -> Result<Vec<HistoryRecord>>;

    /// `GET /api/admin/nlu`
    async fn training_records(&self) -> Result<Vec<TrainingRecord>>;

    /// `POST /api/admin/nlu`
    async fn create_training_record(&self, draft: &TrainingDraft) -> Result<String>;

    /// `DELETE /api/admin/nlu/{id}`
    async fn delete_training_record(&self, id: TrainingRecordId) -> Result<String>;

    /// `POST /api/admin/retrain`
    async fn retrain(&self) -> Result<String>;

    /// `GET /ping`
    async fn ping(&self) -> Result<String>;

    /// Cookie header the transport currently carries, for persistence.
    fn export_cookies(&self) -> Option<String> {
        None
    }

    /// Seeds the transport with a previously exported cookie header.
    fn import_cookies(&self, _cookies: &str) {}

    /// Drops every cookie the transport carries.
    fn clear_cookies(&self) {}
}
