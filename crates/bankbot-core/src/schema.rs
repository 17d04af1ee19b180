//! Wire schema shared by every call site.
//!
//! Each JSON body exchanged with the banking service is defined exactly once
//! here, and converted into domain types at this boundary. Field renames on
//! the service side (e.g. `account` vs `account_number`) are absorbed with
//! serde aliases instead of being re-derived per caller.

use serde::{Deserialize, Serialize};

use crate::admin::{HistoryRecord, TrainingRecord};
use crate::chat::BotReply;
use crate::error::{BankbotError, Result};
use crate::identity::{Identity, IdentityKind};
use crate::money::Money;
use crate::transaction::StatementLine;

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub account_number: &'a str,
    pub password: &'a str,
}

/// Admin login body.
///
/// Deployments disagree on whether the identifier is called `username`
/// or `email`, so both carry the same value.
#[derive(Serialize)]
pub struct AdminLoginRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct TrainingDraftRequest<'a> {
    pub text: &'a str,
    pub bot_reply: &'a str,
    pub intent: &'a str,
}

// ============================================================================
// Response bodies
// ============================================================================

/// `{success, message}` acknowledgement returned by mutations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusEnvelope {
    /// Returns the server message on success, `Rejected` otherwise.
    ///
    /// `fallback` stands in when the service sends no message.
    pub fn into_result(self, fallback: &str) -> Result<String> {
        let message = self
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        if self.success {
            Ok(message)
        } else {
            Err(BankbotError::rejected(message))
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
}

impl From<ChatResponse> for BotReply {
    fn from(value: ChatResponse) -> Self {
        BotReply {
            response: value.response,
            intent: value.intent,
        }
    }
}

/// User profile as returned by login and profile endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "account")]
    pub account_number: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub card_last4: Option<String>,
}

impl UserPayload {
    /// Converts the payload into a user identity.
    ///
    /// The login response carries no email, so the one the user logged in
    /// with is used when absent. A negative balance is a contract violation.
    pub fn into_identity(self, fallback_email: &str) -> Result<Identity> {
        let balance = self
            .balance
            .map(Money::from_amount)
            .transpose()
            .map_err(|err| BankbotError::decode(format!("invalid balance: {err}")))?;
        let email = self
            .email
            .filter(|email| !email.is_empty())
            .unwrap_or_else(|| fallback_email.to_string());
        let name = self.name.unwrap_or_else(|| email.clone());

        Ok(Identity {
            kind: IdentityKind::User,
            id: self.id,
            name,
            email,
            account_number: self.account_number,
            balance: Some(balance.unwrap_or_default()),
            card_last4: self.card_last4,
        })
    }
}

/// `{success, user?, message?}` returned by login and profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<UserPayload>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UserEnvelope {
    pub fn into_identity(self, fallback_email: &str, fallback_message: &str) -> Result<Identity> {
        if !self.success {
            let message = self
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| fallback_message.to_string());
            return Err(BankbotError::rejected(message));
        }
        self.user
            .ok_or_else(|| BankbotError::decode("success response without user"))?
            .into_identity(fallback_email)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPayload {
    pub query: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, alias = "timestamp")]
    pub date: Option<String>,
}

impl TryFrom<HistoryPayload> for HistoryRecord {
    type Error = BankbotError;

    fn try_from(value: HistoryPayload) -> Result<Self> {
        if !(0.0..=1.0).contains(&value.confidence) {
            return Err(BankbotError::decode(format!(
                "confidence {} outside [0, 1]",
                value.confidence
            )));
        }
        Ok(HistoryRecord {
            query: value.query,
            intent: value.intent.unwrap_or_else(|| "unknown".to_string()),
            confidence: value.confidence,
            timestamp: value.date.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryPayload>,
}

impl HistoryResponse {
    pub fn into_records(self) -> Result<Vec<HistoryRecord>> {
        self.history.into_iter().map(HistoryRecord::try_from).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingListResponse {
    #[serde(default)]
    pub data: Vec<TrainingRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatementPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    #[serde(default, alias = "description")]
    pub desc: String,
    #[serde(default, alias = "timestamp")]
    pub ts: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatementResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transactions: Vec<StatementPayload>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatementResponse {
    pub fn into_lines(self) -> Result<Vec<StatementLine>> {
        if !self.success {
            return Err(BankbotError::rejected(
                self.message
                    .unwrap_or_else(|| "Could not load mini statement.".to_string()),
            ));
        }
        self.transactions
            .into_iter()
            .map(|line| {
                let amount = Money::from_amount(line.amount)
                    .map_err(|err| BankbotError::decode(format!("invalid amount: {err}")))?;
                Ok(StatementLine {
                    kind: line.kind,
                    amount,
                    description: line.desc,
                    timestamp: line.ts,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub message: String,
}

/// Extracts a human-readable message from an error body, if it has one.
pub fn message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<StatusEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
}
