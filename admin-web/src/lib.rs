//! Admin web surface for the contact inbox
//!
//! Serves the embedded landing and admin pages, the login/logout
//! endpoints, and mounts the contact API router. Login is gated
//! server-side: credentials are checked in constant time against the
//! configured pair, successful logins mint a session token, and failures
//! are throttled per source IP with exponential backoff and a lockout.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::extract::connect_info::ConnectInfo;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use contact_api::routes::contact_router;
use contact_api::ContactState;
use session_store::{credentials_match, SessionStore};
use site_config::AdminConfig;

/// Drop rate-limit tracking for an address after this long without an attempt
const RATE_STALE_AFTER: Duration = Duration::from_secs(15 * 60);
/// Failures before an address is locked out
const LOCKOUT_THRESHOLD: u32 = 4;
/// How long a locked-out address stays locked out
const LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Rate limit tracking entry for IP-based login throttling
struct RateLimitEntry {
    failed_attempts: u32,
    last_attempt: Instant,
}

/// Shared admin state
pub struct AdminState {
    /// Contact API state, shared with the mounted contact router
    pub contact: Arc<ContactState>,
    /// Session tokens minted at login
    pub sessions: Arc<SessionStore>,
    /// Configured admin credential pair
    credentials: AdminConfig,
    /// IP-based login throttling
    rate_limits: tokio::sync::Mutex<HashMap<IpAddr, RateLimitEntry>>,
}

impl AdminState {
    pub fn new(
        contact: Arc<ContactState>,
        sessions: Arc<SessionStore>,
        credentials: AdminConfig,
    ) -> Self {
        Self {
            contact,
            sessions,
            credentials,
            rate_limits: tokio::sync::Mutex::new(HashMap::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    token: String,
}

/// Build the full application router: pages, auth endpoints, contact API.
pub fn admin_router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/admin", get(admin_page_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .with_state(state.clone())
        .merge(contact_router(state.contact.clone()))
}

/// Start the web server on the specified address
pub async fn run_server(addr: &str, state: Arc<AdminState>) -> Result<()> {
    let app = admin_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Site server listening on http://{}", addr);
    println!("Admin inbox available at /admin");

    // Client IPs for login throttling come from the connection, not headers
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn admin_page_handler() -> impl IntoResponse {
    Html(ADMIN_HTML)
}

async fn login_handler(
    State(state): State<Arc<AdminState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let client_ip = addr.ip();

    // ~ Lockout Check ~
    {
        let mut rate_limits = state.rate_limits.lock().await;

        let cutoff = Instant::now() - RATE_STALE_AFTER;
        rate_limits.retain(|_, entry| entry.last_attempt > cutoff);

        if let Some(entry) = rate_limits.get(&client_ip) {
            if entry.failed_attempts >= LOCKOUT_THRESHOLD {
                let lockout_end = entry.last_attempt + LOCKOUT_DURATION;
                if Instant::now() < lockout_end {
                    let remaining = lockout_end.duration_since(Instant::now()).as_secs();
                    println!(
                        "Rate limit: {} is locked out ({} failures), {} seconds remaining",
                        client_ip, entry.failed_attempts, remaining
                    );
                    return (
                        StatusCode::TOO_MANY_REQUESTS,
                        Json(serde_json::json!({
                            "error": "Too many failed attempts",
                            "retryAfterSecs": remaining,
                        })),
                    )
                        .into_response();
                }
            }
        }
    }

    // ~ Credential Check ~
    let expected_password = match state.credentials.password() {
        Ok(password) => password,
        Err(e) => {
            eprintln!("Error: could not decode admin password from config: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Server misconfigured" })),
            )
                .into_response();
        }
    };

    if credentials_match(
        &state.credentials.username,
        &expected_password,
        &body.username,
        &body.password,
    ) {
        state.rate_limits.lock().await.remove(&client_ip);
        let token = state.sessions.create(&body.username);
        println!("Admin login from {}", client_ip);
        return Json(LoginResponse { token }).into_response();
    }

    // Track the failure and back off before answering
    let delay_secs = {
        let mut rate_limits = state.rate_limits.lock().await;
        let entry = rate_limits.entry(client_ip).or_insert(RateLimitEntry {
            failed_attempts: 0,
            last_attempt: Instant::now(),
        });
        entry.failed_attempts += 1;
        entry.last_attempt = Instant::now();

        // Exponential backoff: 1s, 2s, 4s, 8s (capped)
        let delay = match entry.failed_attempts {
            1 => 1,
            2 => 2,
            3 => 4,
            _ => 8,
        };

        println!(
            "Rate limit: {} failed login {} time(s), delay {}s",
            client_ip, entry.failed_attempts, delay
        );

        delay
    };
    tokio::time::sleep(Duration::from_secs(delay_secs)).await;

    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Invalid credentials" })),
    )
        .into_response()
}

async fn logout_handler(State(state): State<Arc<AdminState>>, headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) => {
            state.sessions.revoke(token);
            Json(serde_json::json!({ "success": true })).into_response()
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Missing session token" })),
        )
            .into_response(),
    }
}

const INDEX_HTML: &str = include_str!("../static/index.html");
const ADMIN_HTML: &str = include_str!("../static/admin.html");

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use message_store::MessageStore;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn fixture() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let store = MessageStore::open_at(dir.path().join("messages.json"));
        let sessions = Arc::new(SessionStore::new());
        let contact = Arc::new(ContactState::new(store, sessions.clone()));
        let state = Arc::new(AdminState::new(
            contact,
            sessions,
            AdminConfig::new("admin", "painted-door"),
        ));
        (dir, admin_router(state))
    }

    fn login_from(ip: [u8; 4], body: &str) -> Request<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 51000))));
        request
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    const GOOD: &str = r#"{"username":"admin","password":"painted-door"}"#;
    const BAD: &str = r#"{"username":"admin","password":"wrong"}"#;

    #[tokio::test]
    async fn login_token_gates_the_contact_api() {
        let (_dir, router) = fixture();

        let response = router
            .clone()
            .oneshot(login_from([127, 0, 0, 1], GOOD))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(!token.is_empty());

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/contact")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_password_is_rejected() {
        let (_dir, router) = fixture();

        let response = router
            .clone()
            .oneshot(login_from([127, 0, 0, 1], BAD))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_failures_lock_the_address_out() {
        let (_dir, router) = fixture();

        for _ in 0..4 {
            let response = router
                .clone()
                .oneshot(login_from([10, 0, 0, 9], BAD))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        // Fifth attempt from the same address is refused outright, even
        // with the right password
        let response = router
            .clone()
            .oneshot(login_from([10, 0, 0, 9], GOOD))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        // A different address is unaffected
        let response = router
            .clone()
            .oneshot(login_from([10, 0, 0, 10], GOOD))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let (_dir, router) = fixture();

        let response = router
            .clone()
            .oneshot(login_from([127, 0, 0, 1], GOOD))
            .await
            .unwrap();
        let token = body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/logout")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/contact")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn pages_are_served() {
        let (_dir, router) = fixture();

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
