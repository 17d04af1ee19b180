//! In-memory doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use bankbot_core::admin::{HistoryRecord, TrainingDraft, TrainingRecord, TrainingRecordId};
use bankbot_core::api::BankApi;
use bankbot_core::chat::BotReply;
use bankbot_core::error::{BankbotError, Result};
use bankbot_core::identity::{
    Credentials, Identity, IdentityKind, Registration, SessionRepository, StoredSession,
};
use bankbot_core::money::Money;
use bankbot_core::transaction::StatementLine;
use bankbot_core::ui::{Notice, Notifier};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const SESSION_COOKIE: &str = "session=mock";

pub fn user_identity(name: &str, email: &str, account: &str) -> Identity {
    Identity {
        kind: IdentityKind::User,
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        account_number: Some(account.to_string()),
        balance: Some(Money::from_cents(0)),
        card_last4: None,
    }
}

/// Stand-in for the remote service, keeping its records in memory.
#[derive(Default)]
pub struct MockBankApi {
    users: Mutex<HashMap<String, (String, Identity)>>,
    training: Mutex<Vec<TrainingRecord>>,
    history: Mutex<Vec<HistoryRecord>>,
    next_id: AtomicI64,
    cookies: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
    /// Protected endpoints answer 403
    expired: AtomicBool,
    /// Every request fails at the transport level
    offline: AtomicBool,
    /// Server message for the next protected call, answered `success: false`
    rejection: Mutex<Option<String>>,
}

impl MockBankApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    pub fn with_user(self, identity: Identity, password: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(identity.email.clone(), (password.to_string(), identity));
        self
    }

    pub fn with_training(self, records: Vec<TrainingRecord>) -> Self {
        let max = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        self.next_id.store(max + 1, Ordering::SeqCst);
        *self.training.lock().unwrap() = records;
        self
    }

    pub fn with_history(self, records: Vec<HistoryRecord>) -> Self {
        *self.history.lock().unwrap() = records;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remote_training(&self) -> Vec<TrainingRecord> {
        self.training.lock().unwrap().clone()
    }

    pub fn set_expired(&self, expired: bool) {
        self.expired.store(expired, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn reject_next(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        self.calls.lock().unwrap().push(call.into());
        if self.offline.load(Ordering::SeqCst) {
            return Err(BankbotError::transport("connection refused"));
        }
        Ok(())
    }

    fn protected(&self, call: impl Into<String>) -> Result<()> {
        self.record(call)?;
        if self.expired.load(Ordering::SeqCst) {
            return Err(BankbotError::Unauthorized { status: 403 });
        }
        match self.rejection.lock().unwrap().take() {
            Some(message) => Err(BankbotError::rejected(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BankApi for MockBankApi {
    async fn chat(&self, message: &str) -> Result<BotReply> {
        self.record(format!("chat {message}"))?;
        Ok(BotReply {
            response: Some(format!("echo: {message}")),
            intent: Some("echo".into()),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<Identity> {
        self.record(format!("login {}", credentials.email))?;
        let users = self.users.lock().unwrap();
        match users.get(&credentials.email) {
            Some((password, identity)) if *password == credentials.password => {
                *self.cookies.lock().unwrap() = Some(SESSION_COOKIE.to_string());
                Ok(identity.clone())
            }
            _ => Err(BankbotError::rejected("Invalid credentials.")),
        }
    }

    async fn register(&self, registration: &Registration) -> Result<String> {
        self.record(format!("register {}", registration.email))?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&registration.email) {
            return Err(BankbotError::rejected("Email already registered."));
        }
        let identity = user_identity(
            &registration.name,
            &registration.email,
            &registration.account_number,
        );
        users.insert(
            registration.email.clone(),
            (registration.password.clone(), identity),
        );
        Ok("Registration successful! Please log in.".into())
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout")?;
        *self.cookies.lock().unwrap() = None;
        Ok(())
    }

    async fn profile(&self) -> Result<Identity> {
        self.protected("profile")?;
        let users = self.users.lock().unwrap();
        users
            .values()
            .next()
            .map(|(_, identity)| identity.clone())
            .ok_or_else(|| BankbotError::rejected("User not found."))
    }

    async fn mini_statement(&self) -> Result<Vec<StatementLine>> {
        self.protected("mini_statement")?;
        Ok(Vec::new())
    }

    async fn admin_login(&self, credentials: &Credentials) -> Result<String> {
        self.record(format!("admin_login {}", credentials.email))?;
        if credentials.email == ADMIN_USERNAME && credentials.password == ADMIN_PASSWORD {
            *self.cookies.lock().unwrap() = Some(SESSION_COOKIE.to_string());
            Ok("Admin login successful.".into())
        } else {
            Err(BankbotError::rejected("Invalid admin credentials."))
        }
    }

    async fn chat_history(&self) -> Result<Vec<HistoryRecord>> {
        self.protected("chat_history")?;
        Ok(self.history.lock().unwrap().clone())
    }

    async fn training_records(&self) -> Result<Vec<TrainingRecord>> {
        self.protected("training_records")?;
        Ok(self.training.lock().unwrap().clone())
    }

    async fn create_training_record(&self, draft: &TrainingDraft) -> Result<String> {
        self.protected(format!("create_training_record {}", draft.intent))?;
        let id = TrainingRecordId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.training.lock().unwrap().push(TrainingRecord {
            id,
            text: draft.text.clone(),
            bot_reply: draft.bot_reply.clone(),
            intent: draft.intent.clone(),
        });
        Ok("Training data added.".into())
    }

    async fn delete_training_record(&self, id: TrainingRecordId) -> Result<String> {
        self.protected(format!("delete_training_record {id}"))?;
        let mut training = self.training.lock().unwrap();
        let before = training.len();
        training.retain(|record| record.id != id);
        if training.len() == before {
            return Err(BankbotError::rejected("Record not found."));
        }
        Ok("Training data deleted.".into())
    }

    async fn retrain(&self) -> Result<String> {
        self.protected("retrain")?;
        Ok("Model retrained successfully.".into())
    }

    async fn ping(&self) -> Result<String> {
        self.record("ping")?;
        Ok("pong".into())
    }

    fn export_cookies(&self) -> Option<String> {
        self.cookies.lock().unwrap().clone()
    }

    fn import_cookies(&self, cookies: &str) {
        *self.cookies.lock().unwrap() = Some(cookies.to_string());
    }

    fn clear_cookies(&self) {
        *self.cookies.lock().unwrap() = None;
    }
}

/// Session cache held in memory.
#[derive(Default)]
pub struct MockSessionRepository {
    stored: Mutex<Option<StoredSession>>,
}

impl MockSessionRepository {
    pub fn with(session: StoredSession) -> Self {
        Self {
            stored: Mutex::new(Some(session)),
        }
    }

    pub fn stored(&self) -> Option<StoredSession> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.stored())
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        *self.stored.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.stored.lock().unwrap() = None;
        Ok(())
    }
}

/// Notifier that keeps every notice for later inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.notices
            .lock()
            .unwrap()
            .last()
            .map(|notice| notice.message.clone())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
