//! Access control for the admin dashboard.

use std::future::Future;
use std::sync::Arc;

use bankbot_core::api::BankApi;
use bankbot_core::error::{BankbotError, GENERIC_FAILURE_MESSAGE, Result};
use bankbot_core::identity::{Credentials, Identity};
use bankbot_core::ui::Notice;

use crate::session_store::SessionStore;

pub const ADMIN_LOGIN_REQUIRED: &str = "Please log in as an administrator.";

/// What the admin area should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
    Login,
    Dashboard,
}

/// Guard layered on [`SessionStore`] that only lets admin sessions through.
///
/// Visibility is derived from the current identity on every call, so a
/// session that expires mid-operation falls back to [`AdminView::Login`].
#[derive(Clone)]
pub struct AdminGate {
    session: Arc<SessionStore>,
}

impl AdminGate {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn api(&self) -> &Arc<dyn BankApi> {
        self.session.api()
    }

    pub async fn view(&self) -> AdminView {
        if self.session.is_admin().await {
            AdminView::Dashboard
        } else {
            AdminView::Login
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Identity> {
        self.session.authenticate_admin(credentials).await
    }

    /// Runs an admin operation.
    ///
    /// `op` is never polled without an admin session, so a refused call
    /// sends no request. A 401/403 ends the session through
    /// [`SessionStore::guard`]; other failures are returned unreported.
    pub async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.view().await != AdminView::Dashboard {
            tracing::debug!("[AdminGate] Refused admin operation without admin session");
            return Err(BankbotError::validation(ADMIN_LOGIN_REQUIRED));
        }
        self.session.guard(op.await).await
    }

    /// Asks the service to retrain its model.
    pub async fn retrain(&self) -> Result<String> {
        let notifier = self.session.notifier();
        match self.run(self.api().retrain()).await {
            Ok(message) => {
                tracing::info!("[AdminGate] Retrain requested: {}", message);
                notifier.notify(Notice::success(message.clone()));
                Ok(message)
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    notifier.notify(Notice::error(e.user_message(GENERIC_FAILURE_MESSAGE)));
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        ADMIN_PASSWORD, ADMIN_USERNAME, MockBankApi, MockSessionRepository, RecordingNotifier,
    };

    fn gate() -> (Arc<MockBankApi>, Arc<RecordingNotifier>, AdminGate) {
        let api = Arc::new(MockBankApi::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let session = SessionStore::new(
            api.clone(),
            Arc::new(MockSessionRepository::default()),
            notifier.clone(),
        );
        (api, notifier, AdminGate::new(Arc::new(session)))
    }

    async fn logged_in() -> (Arc<MockBankApi>, Arc<RecordingNotifier>, AdminGate) {
        let (api, notifier, gate) = gate();
        gate.login(&Credentials::new(ADMIN_USERNAME, ADMIN_PASSWORD))
            .await
            .unwrap();
        (api, notifier, gate)
    }

    #[tokio::test]
    async fn test_view_follows_identity() {
        let (_, _, gate) = gate();
        assert_eq!(gate.view().await, AdminView::Login);

        gate.login(&Credentials::new(ADMIN_USERNAME, ADMIN_PASSWORD))
            .await
            .unwrap();
        assert_eq!(gate.view().await, AdminView::Dashboard);
    }

    #[tokio::test]
    async fn test_refuses_without_admin_session() {
        let (api, _, gate) = gate();

        let err = gate.retrain().await.unwrap_err();

        assert!(err.is_validation());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_hides_dashboard() {
        let (api, notifier, gate) = logged_in().await;
        api.set_expired(true);

        let err = gate.run(api.chat_history()).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(gate.view().await, AdminView::Login);
        assert!(notifier.last_message().unwrap().contains("expired"));
    }

    #[tokio::test]
    async fn test_retrain_reports_success() {
        let (_, notifier, gate) = logged_in().await;

        let message = gate.retrain().await.unwrap();

        assert_eq!(message, "Model retrained successfully.");
        assert_eq!(notifier.last_message().as_deref(), Some(message.as_str()));
    }
}
