//! Exercises `HttpBankApi` against a one-shot canned HTTP server.

use bankbot_core::BankbotError;
use bankbot_core::api::BankApi;
use bankbot_core::config::ClientConfig;
use bankbot_core::identity::Credentials;
use bankbot_interaction::HttpBankApi;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves a single response and hands back the raw request it received.
async fn serve_once(
    status: &'static str,
    extra_headers: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n{extra_headers}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
    });

    (format!("http://{addr}"), rx)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };
    let length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    body.len() >= length
}

fn client(base_url: String) -> HttpBankApi {
    HttpBankApi::new(&ClientConfig {
        base_url,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_login_decodes_identity_and_keeps_session_cookie() {
    let (base_url, request) = serve_once(
        "200 OK",
        "Set-Cookie: session=s3cr3t; Path=/; HttpOnly\r\n",
        r#"{"success": true, "user": {"name": "Ada", "email": "ada@bank.example", "account": "ACC-1", "balance": 250.5}}"#,
    )
    .await;
    let api = client(base_url);

    let identity = api
        .login(&Credentials::new("ada@bank.example", "pw"))
        .await
        .unwrap();
    assert_eq!(identity.name, "Ada");
    assert_eq!(identity.account_number.as_deref(), Some("ACC-1"));
    assert_eq!(identity.balance.map(|b| b.cents()), Some(25_050));

    let raw = request.await.unwrap();
    assert!(raw.starts_with("POST /api/login "));
    assert!(raw.contains(r#""email":"ada@bank.example""#));
    assert_eq!(api.export_cookies().as_deref(), Some("session=s3cr3t"));
}

#[tokio::test]
async fn test_forbidden_history_is_unauthorized() {
    let (base_url, request) = serve_once("403 Forbidden", "", r#"{"message": "Admin only"}"#).await;
    let api = client(base_url);

    let err = api.chat_history().await.unwrap_err();
    assert_eq!(err, BankbotError::Unauthorized { status: 403 });

    let raw = request.await.unwrap();
    assert!(raw.starts_with("GET /api/admin/history "));
}

#[tokio::test]
async fn test_rejected_registration_surfaces_server_message() {
    let (base_url, _request) = serve_once(
        "200 OK",
        "",
        r#"{"success": false, "message": "Email already registered."}"#,
    )
    .await;
    let api = client(base_url);

    let registration = bankbot_core::identity::Registration {
        name: "Ada".into(),
        email: "ada@bank.example".into(),
        account_number: "ACC-1".into(),
        password: "pw".into(),
    };
    let err = api.register(&registration).await.unwrap_err();
    assert_eq!(err, BankbotError::rejected("Email already registered."));
}

#[tokio::test]
async fn test_not_found_delete_surfaces_server_message() {
    let (base_url, request) = serve_once(
        "404 Not Found",
        "",
        r#"{"success": false, "message": "Record 7 not found."}"#,
    )
    .await;
    let api = client(base_url);

    let err = api
        .delete_training_record(bankbot_core::admin::TrainingRecordId(7))
        .await
        .unwrap_err();
    assert_eq!(err, BankbotError::rejected("Record 7 not found."));

    let raw = request.await.unwrap();
    assert!(raw.starts_with("DELETE /api/admin/nlu/7 "));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}")).ping().await.unwrap_err();
    assert!(matches!(err, BankbotError::Transport(_)));
}
