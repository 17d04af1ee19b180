//! HttpBankApi - REST client for the banking chatbot service.
//!
//! Every request carries the cookie jar, mirroring a browser's
//! `credentials: "include"`. The jar can be exported and re-imported so a
//! server-side session survives process restarts.

use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use bankbot_core::admin::{HistoryRecord, TrainingDraft, TrainingRecord, TrainingRecordId};
use bankbot_core::api::BankApi;
use bankbot_core::chat::BotReply;
use bankbot_core::config::ClientConfig;
use bankbot_core::error::{BankbotError, Result};
use bankbot_core::identity::{Credentials, Identity, Registration};
use bankbot_core::schema::{
    self, AdminLoginRequest, ChatRequest, ChatResponse, HistoryResponse, LoginRequest,
    PingResponse, RegisterRequest, StatementResponse, StatusEnvelope, TrainingDraftRequest,
    TrainingListResponse, UserEnvelope,
};
use bankbot_core::transaction::StatementLine;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Whether an endpoint requires an established session.
///
/// On protected endpoints 401/403 means the session is gone. On public
/// ones (login, register) the same statuses carry an ordinary rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// `BankApi` implementation over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBankApi {
    client: Client,
    base_url: Url,
    jar: Arc<CookieStoreMutex>,
}

impl HttpBankApi {
    /// Creates a client for the service described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = parse_base_url(&config.base_url)?;
        let jar = Arc::new(CookieStoreMutex::new(CookieStore::default()));
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| BankbotError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    fn with_jar<R>(&self, f: impl FnOnce(&mut CookieStore) -> R) -> R {
        let mut store = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BankbotError::internal(format!("Invalid endpoint path '{path}': {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.url(path)?))
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<RequestBuilder> {
        Ok(self.request(method, path)?.json(body))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, access: Access) -> Result<T> {
        let request = request
            .build()
            .map_err(|e| BankbotError::internal(format!("Failed to build request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        tracing::debug!("[HttpBankApi] {} {} -> {}", method, path, status.as_u16());

        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let err = map_http_error(status, &body, access);
            tracing::warn!("[HttpBankApi] {} {} failed: {}", method, path, err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            BankbotError::decode(format!("{method} {path}: {e}"))
        })
    }
}

#[async_trait]
impl BankApi for HttpBankApi {
    async fn chat(&self, message: &str) -> Result<BotReply> {
        let request = self.json_request(Method::POST, "api/chat", &ChatRequest { message })?;
        let response: ChatResponse = self.send(request, Access::Public).await?;
        Ok(response.into())
    }

    async fn login(&self, credentials: &Credentials) -> Result<Identity> {
        let body = LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        };
        let request = self.json_request(Method::POST, "api/login", &body)?;
        let envelope: UserEnvelope = self.send(request, Access::Public).await?;
        envelope.into_identity(&credentials.email, "Login failed.")
    }

    async fn register(&self, registration: &Registration) -> Result<String> {
        let body = RegisterRequest {
            name: &registration.name,
            email: &registration.email,
            account_number: &registration.account_number,
            password: &registration.password,
        };
        let request = self.json_request(Method::POST, "api/register", &body)?;
        let envelope: StatusEnvelope = self.send(request, Access::Public).await?;
        envelope.into_result("Registration failed.")
    }

    async fn logout(&self) -> Result<()> {
        let request = self.request(Method::POST, "api/logout")?;
        let envelope: StatusEnvelope = self.send(request, Access::Public).await?;
        envelope.into_result("Logout failed.").map(|_| ())
    }

    async fn profile(&self) -> Result<Identity> {
        let request = self.request(Method::GET, "api/profile")?;
        let envelope: UserEnvelope = self.send(request, Access::Protected).await?;
        envelope.into_identity("", "Could not load profile.")
    }

    async fn mini_statement(&self) -> Result<Vec<StatementLine>> {
        let request = self.request(Method::GET, "api/mini_statement")?;
        let response: StatementResponse = self.send(request, Access::Protected).await?;
        response.into_lines()
    }

    async fn admin_login(&self, credentials: &Credentials) -> Result<String> {
        let body = AdminLoginRequest {
            username: &credentials.email,
            email: &credentials.email,
            password: &credentials.password,
        };
        let request = self.json_request(Method::POST, "api/admin/login", &body)?;
        let envelope: StatusEnvelope = self.send(request, Access::Public).await?;
        envelope.into_result("Admin login failed.")
    }

    async fn chat_history(&self) -> Result<Vec<HistoryRecord>> {
        let request = self.request(Method::GET, "api/admin/history")?;
        let response: HistoryResponse = self.send(request, Access::Protected).await?;
        response.into_records()
    }

    async fn training_records(&self) -> Result<Vec<TrainingRecord>> {
        let request = self.request(Method::GET, "api/admin/nlu")?;
        let response: TrainingListResponse = self.send(request, Access::Protected).await?;
        Ok(response.data)
    }

    async fn create_training_record(&self, draft: &TrainingDraft) -> Result<String> {
        let body = TrainingDraftRequest {
            text: &draft.text,
            bot_reply: &draft.bot_reply,
            intent: &draft.intent,
        };
        let request = self.json_request(Method::POST, "api/admin/nlu", &body)?;
        let envelope: StatusEnvelope = self.send(request, Access::Protected).await?;
        envelope.into_result("Failed to add training record.")
    }

    async fn delete_training_record(&self, id: TrainingRecordId) -> Result<String> {
        let request = self.request(Method::DELETE, &format!("api/admin/nlu/{id}"))?;
        let envelope: StatusEnvelope = self.send(request, Access::Protected).await?;
        envelope.into_result("Failed to delete training record.")
    }

    async fn retrain(&self) -> Result<String> {
        let request = self.request(Method::POST, "api/admin/retrain")?;
        let envelope: StatusEnvelope = self.send(request, Access::Protected).await?;
        envelope.into_result("Retraining failed.")
    }

    async fn ping(&self) -> Result<String> {
        let request = self.request(Method::GET, "ping")?;
        let response: PingResponse = self.send(request, Access::Public).await?;
        Ok(response.message)
    }

    fn export_cookies(&self) -> Option<String> {
        let header = self.with_jar(|store| {
            store
                .get_request_values(&self.base_url)
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ")
        });
        (!header.is_empty()).then_some(header)
    }

    fn import_cookies(&self, cookies: &str) {
        self.with_jar(|store| {
            for pair in cookie_pairs(cookies) {
                if let Err(e) = store.parse(pair, &self.base_url) {
                    tracing::debug!("[HttpBankApi] Skipping cached cookie: {}", e);
                }
            }
        });
    }

    /// Drops every cookie, whatever its path or domain.
    fn clear_cookies(&self) {
        self.with_jar(CookieStore::clear);
    }
}

/// Normalizes the configured root so relative endpoint paths keep any
/// path prefix (e.g. `https://host/bank/` + `api/chat`).
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash)
        .map_err(|e| BankbotError::config(format!("Invalid base_url '{raw}': {e}")))
}

fn cookie_pairs(header: &str) -> impl Iterator<Item = &str> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| pair.contains('='))
}

fn map_transport_error(err: reqwest::Error) -> BankbotError {
    if err.is_timeout() {
        BankbotError::transport(format!("request timed out: {err}"))
    } else if err.is_decode() {
        BankbotError::decode(err.to_string())
    } else {
        BankbotError::transport(err.to_string())
    }
}

/// Maps a non-success response onto the client error taxonomy.
pub fn map_http_error(status: StatusCode, body: &str, access: Access) -> BankbotError {
    let unauthorized = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
    if access == Access::Protected && unauthorized {
        return BankbotError::Unauthorized {
            status: status.as_u16(),
        };
    }

    match schema::message_from_body(body) {
        Some(message) => BankbotError::rejected(message),
        None => BankbotError::Http {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpBankApi {
        HttpBankApi::new(&ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_forbidden_on_protected_endpoint_is_unauthorized() {
        let err = map_http_error(StatusCode::FORBIDDEN, "", Access::Protected);
        assert_eq!(err, BankbotError::Unauthorized { status: 403 });
    }

    #[test]
    fn test_unauthorized_on_login_is_rejection() {
        let body = r#"{"success": false, "message": "Invalid credentials."}"#;
        let err = map_http_error(StatusCode::UNAUTHORIZED, body, Access::Public);
        assert_eq!(err, BankbotError::rejected("Invalid credentials."));
    }

    #[test]
    fn test_html_error_page_is_http_error() {
        let err = map_http_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>oops</html>",
            Access::Public,
        );
        assert_eq!(
            err,
            BankbotError::Http {
                status: 500,
                message: "Internal Server Error".into()
            }
        );
    }

    #[test]
    fn test_protected_failure_keeps_server_message() {
        let body = r#"{"success": false, "message": "Record 7 not found."}"#;
        for status in [StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND] {
            let err = map_http_error(status, body, Access::Protected);
            assert_eq!(err, BankbotError::rejected("Record 7 not found."));
            assert_eq!(err.user_message("fallback"), "Record 7 not found.");
        }
    }

    #[test]
    fn test_endpoint_urls_keep_prefix() {
        let prefixed = api("https://bank.example/bot");
        assert_eq!(
            prefixed.url("api/admin/nlu/7").unwrap().as_str(),
            "https://bank.example/bot/api/admin/nlu/7"
        );
        let bare = api("http://127.0.0.1:5000");
        assert_eq!(bare.url("/ping").unwrap().as_str(), "http://127.0.0.1:5000/ping");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpBankApi::new(&ClientConfig {
            base_url: "bank.example".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(BankbotError::Config(_))));
    }

    #[test]
    fn test_cookie_round_trip_and_clear() {
        let api = api("http://127.0.0.1:5000");
        assert!(api.export_cookies().is_none());

        api.import_cookies("session=abc123; theme=dark");
        let exported = api.export_cookies().unwrap();
        assert!(exported.contains("session=abc123"));
        assert!(exported.contains("theme=dark"));

        api.clear_cookies();
        assert!(api.export_cookies().is_none());
    }

    #[test]
    fn test_clear_drops_root_path_cookie_under_prefixed_base() {
        let api = api("http://127.0.0.1:5000/bot");
        let login_url = api.url("api/login").unwrap();
        api.with_jar(|store| store.parse("session=abc; Path=/", &login_url))
            .unwrap();
        assert_eq!(api.export_cookies().as_deref(), Some("session=abc"));

        api.clear_cookies();

        assert!(api.export_cookies().is_none());
    }
}
