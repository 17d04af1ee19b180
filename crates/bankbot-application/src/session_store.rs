use std::sync::Arc;

use bankbot_core::api::BankApi;
use bankbot_core::error::{BankbotError, GENERIC_FAILURE_MESSAGE, Result};
use bankbot_core::identity::{
    Credentials, Identity, IdentityKind, Registration, SessionRepository, StoredSession,
};
use bankbot_core::transaction::StatementLine;
use bankbot_core::ui::{Notice, Notifier};
use tokio::sync::RwLock;

/// Holds the authenticated identity for the lifetime of the client.
///
/// `SessionStore` is responsible for:
/// - Establishing sessions through the remote service (user and admin)
/// - Caching the session in client-local storage across runs
/// - Ending the session on logout or when the service reports expiry
///
/// The remote service is the only judge of credentials. The cached session
/// is a hint: any protected request may reveal that it is gone, and
/// [`SessionStore::guard`] then ends it.
pub struct SessionStore {
    api: Arc<dyn BankApi>,
    repository: Arc<dyn SessionRepository>,
    notifier: Arc<dyn Notifier>,
    identity: RwLock<Option<Identity>>,
}

impl SessionStore {
    /// Creates a store with no active session.
    ///
    /// # Arguments
    ///
    /// * `api` - Client for the remote service
    /// * `repository` - Client-local cache for the session
    /// * `notifier` - Receives user-visible notices
    pub fn new(
        api: Arc<dyn BankApi>,
        repository: Arc<dyn SessionRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            repository,
            notifier,
            identity: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &Arc<dyn BankApi> {
        &self.api
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Reloads the cached session, if any, on startup.
    ///
    /// Cookies are handed back to the transport so the server-side session
    /// can be reused. The restored identity is not revalidated here.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    pub async fn restore(&self) -> Result<Option<Identity>> {
        let Some(stored) = self.repository.load().await? else {
            tracing::debug!("[SessionStore] No cached session");
            return Ok(None);
        };

        if let Some(cookies) = stored.cookies.as_deref() {
            self.api.import_cookies(cookies);
        }

        let identity = stored.identity;
        if let Some(identity) = &identity {
            tracing::info!(
                "[SessionStore] Restored {:?} session for {}",
                identity.kind,
                identity.email
            );
        }
        *self.identity.write().await = identity.clone();
        Ok(identity)
    }

    /// Logs a user in.
    ///
    /// On success the returned identity becomes the active session and is
    /// cached. On failure the session is left exactly as it was.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Identity> {
        if let Err(e) = credentials.validate() {
            return Err(self.report(e));
        }

        tracing::info!("[SessionStore] Logging in {}", credentials.email);
        let identity = match self.api.login(credentials).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("[SessionStore] Login failed for {}: {}", credentials.email, e);
                return Err(self.report(e));
            }
        };

        self.establish(identity.clone()).await;
        self.notifier
            .notify(Notice::success(format!("Welcome, {}!", identity.name)));
        Ok(identity)
    }

    /// Logs an administrator in. `credentials.email` carries the username.
    pub async fn authenticate_admin(&self, credentials: &Credentials) -> Result<Identity> {
        if let Err(e) = credentials.validate() {
            return Err(self.report(e));
        }

        tracing::info!("[SessionStore] Admin login for {}", credentials.email);
        let message = match self.api.admin_login(credentials).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("[SessionStore] Admin login failed: {}", e);
                return Err(self.report(e));
            }
        };

        let identity = Identity::admin(credentials.email.trim());
        self.establish(identity.clone()).await;
        self.notifier.notify(Notice::success(message));
        Ok(identity)
    }

    /// Creates an account. Does not establish a session.
    pub async fn register(&self, registration: &Registration) -> Result<String> {
        if let Err(e) = registration.validate() {
            return Err(self.report(e));
        }

        match self.api.register(registration).await {
            Ok(message) => {
                tracing::info!("[SessionStore] Registered {}", registration.email);
                self.notifier.notify(Notice::success(message.clone()));
                Ok(message)
            }
            Err(e) => {
                tracing::warn!("[SessionStore] Registration failed: {}", e);
                Err(self.report(e))
            }
        }
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.identity
            .read()
            .await
            .as_ref()
            .is_some_and(Identity::is_admin)
    }

    /// Forgets the session: in memory, in the transport and in the cache.
    pub async fn end_session(&self) {
        let previous = self.identity.write().await.take();
        self.api.clear_cookies();
        if let Err(e) = self.repository.clear().await {
            tracing::warn!("[SessionStore] Failed to clear cached session: {}", e);
        }
        if let Some(identity) = previous {
            tracing::info!("[SessionStore] Session ended for {}", identity.email);
        }
    }

    /// Logs out on the server (best effort) and ends the local session.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::debug!("[SessionStore] Server logout failed: {}", e);
        }
        self.end_session().await;
        self.notifier.notify(Notice::info("Logged out."));
    }

    /// Confirms the cached session with the service.
    ///
    /// For users the profile is fetched and replaces the cached identity,
    /// so balance changes show up. Admin sessions are checked against the
    /// history endpoint.
    pub async fn revalidate(&self) -> Result<Identity> {
        let Some(current) = self.current_identity().await else {
            return Err(self.report(BankbotError::validation("You are not logged in.")));
        };

        match current.kind {
            IdentityKind::Admin => {
                self.checked(self.api.chat_history().await).await?;
                Ok(current)
            }
            IdentityKind::User => {
                let mut identity = self.checked(self.api.profile().await).await?;
                if identity.email.is_empty() {
                    identity.email = current.email;
                }
                if identity.name.is_empty() {
                    identity.name = current.name;
                }
                self.establish(identity.clone()).await;
                Ok(identity)
            }
        }
    }

    /// Fetches the latest transactions of the logged-in user.
    pub async fn mini_statement(&self) -> Result<Vec<StatementLine>> {
        self.checked(self.api.mini_statement().await).await
    }

    /// Ends the session when `result` says it has expired.
    ///
    /// Expiry is reported to the user here; every other outcome is passed
    /// through untouched for the caller to handle.
    pub async fn guard<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("[SessionStore] Session expired: {}", e);
                self.end_session().await;
                Err(self.report(e))
            }
            other => other,
        }
    }

    /// [`Self::guard`], additionally reporting any other failure.
    async fn checked<T>(&self, result: Result<T>) -> Result<T> {
        match self.guard(result).await {
            Err(e) if !e.is_unauthorized() => Err(self.report(e)),
            other => other,
        }
    }

    async fn establish(&self, identity: Identity) {
        let stored = StoredSession {
            admin_logged_in: identity.is_admin(),
            cookies: self.api.export_cookies(),
            identity: Some(identity.clone()),
        };
        *self.identity.write().await = Some(identity);

        // The cache is a convenience; a failed write keeps the live session.
        if let Err(e) = self.repository.save(&stored).await {
            tracing::warn!("[SessionStore] Failed to cache session: {}", e);
        }
    }

    fn report(&self, error: BankbotError) -> BankbotError {
        self.notifier
            .notify(Notice::error(error.user_message(GENERIC_FAILURE_MESSAGE)));
        error
    }
}
