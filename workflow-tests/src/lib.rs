//! End-to-end test harness for the web frontend.
//!
//! Runs the real router and the real `BackendClient` against an in-process
//! mock of the product REST API, both bound to ephemeral ports, and drives
//! the frontend with a cookie-keeping HTTP client like a browser would.

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use secrecy::Secret;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use web_frontend::config::{
    BackendSettings, ProviderSettings, ServerSettings, Settings, TelemetrySettings,
    TesterSettings,
};
use web_frontend::services::backend::BackendClient;
use web_frontend::startup::build_router;
use web_frontend::AppState;

/// JWT the mock backend issues on every successful login.
pub const TEST_JWT: &str = "jwt-test-token";
/// Provider token the mock backend accepts for `POST /firebase/auth`.
pub const GOOD_PROVIDER_TOKEN: &str = "provider-token-ok";
pub const TESTER_IDENTIFIER: &str = "tester@example.com";
pub const TESTER_PASSWORD: &str = "tester-password";
/// Where the frontend sends browsers to sign in.
pub const PROVIDER_SIGN_IN_URL: &str = "https://id.example.com/signin";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Fixtures and hit counters for the mock backend.
pub struct MockBackendState {
    /// slug -> longUrl
    pub links: Vec<(String, String)>,
    /// slug -> microsite attributes
    pub microsites: Vec<(String, serde_json::Value)>,
    /// Record returned by logins and `GET /users/me`.
    pub user: serde_json::Value,
    pub link_hits: AtomicUsize,
    pub microsite_hits: AtomicUsize,
}

impl MockBackendState {
    pub fn with_fixtures() -> Arc<Self> {
        Arc::new(Self {
            links: vec![(
                "abc123".to_string(),
                "https://example.com/page".to_string(),
            )],
            microsites: vec![(
                "mysite".to_string(),
                serde_json::json!({
                    "shortUrl": "mysite",
                    "displayName": "Jane",
                    "description": "Hi, I'm Jane",
                    "background": "#319795",
                    "imageUrl": "",
                    "size": "md",
                    "selectedStyle": "full",
                    "instagramUser": "jane.gram",
                    "instagramLink": "https://instagram.com/jane.gram"
                }),
            )],
            user: serde_json::json!({
                "id": 1,
                "username": "tester",
                "email": TESTER_IDENTIFIER,
                "confirmed": true
            }),
            link_hits: AtomicUsize::new(0),
            microsite_hits: AtomicUsize::new(0),
        })
    }
}

const SLUG_FILTER: &str = "filters[shortUrl][$eq]";

fn auth_payload(state: &MockBackendState) -> serde_json::Value {
    serde_json::json!({ "jwt": TEST_JWT, "user": state.user })
}

async fn local_login(
    State(state): State<Arc<MockBackendState>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let identifier = body["identifier"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if identifier == TESTER_IDENTIFIER && password == TESTER_PASSWORD {
        (StatusCode::OK, Json(auth_payload(&state)))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Invalid identifier or password" })),
        )
    }
}

async fn provider_exchange(
    State(state): State<Arc<MockBackendState>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    if body["token"].as_str() == Some(GOOD_PROVIDER_TOKEN) {
        (StatusCode::OK, Json(auth_payload(&state)))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Invalid provider token" })),
        )
    }
}

async fn users_me(
    State(state): State<Arc<MockBackendState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if bearer == format!("Bearer {}", TEST_JWT) {
        (StatusCode::OK, Json(state.user.clone()))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Missing or invalid token" })),
        )
    }
}

async fn list_links(
    State(state): State<Arc<MockBackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.link_hits.fetch_add(1, Ordering::SeqCst);
    let slug = params.get(SLUG_FILTER).cloned().unwrap_or_default();

    let data: Vec<serde_json::Value> = state
        .links
        .iter()
        .filter(|(short, _)| *short == slug)
        .enumerate()
        .map(|(i, (short, long))| {
            serde_json::json!({
                "id": i + 1,
                "attributes": { "shortUrl": short, "longUrl": long }
            })
        })
        .collect();

    Json(serde_json::json!({ "data": data }))
}

async fn list_microsites(
    State(state): State<Arc<MockBackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.microsite_hits.fetch_add(1, Ordering::SeqCst);
    let slug = params.get(SLUG_FILTER).cloned().unwrap_or_default();

    let data: Vec<serde_json::Value> = state
        .microsites
        .iter()
        .filter(|(short, _)| *short == slug)
        .enumerate()
        .map(|(i, (_, attributes))| {
            serde_json::json!({ "id": i + 1, "attributes": attributes })
        })
        .collect();

    Json(serde_json::json!({ "data": data }))
}

/// Serve the mock backend on an ephemeral port; returns its base URL.
pub async fn spawn_mock_backend(state: Arc<MockBackendState>) -> Result<String> {
    let app = Router::new()
        .route("/auth/local", post(local_login))
        .route("/firebase/auth", post(provider_exchange))
        .route("/users/me", get(users_me))
        .route("/links/", get(list_links))
        .route("/microsites/", get(list_microsites))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("mock backend exited: {}", e);
        }
    });

    Ok(format!("http://{}", addr))
}

/// Frontend settings pointing at the given backend URL.
pub fn frontend_settings(api_url: &str, tester: Option<(&str, &str)>) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        backend: BackendSettings {
            api_url: api_url.to_string(),
            public_site_url: "http://localhost:9020".to_string(),
        },
        provider: ProviderSettings {
            sign_in_url: PROVIDER_SIGN_IN_URL.to_string(),
        },
        tester: tester.map(|(identifier, password)| TesterSettings {
            enabled: true,
            identifier: identifier.to_string(),
            password: Secret::new(password.to_string()),
        }),
        telemetry: TelemetrySettings::default(),
    }
}

/// Serve the real frontend on an ephemeral port; returns its base URL.
pub async fn spawn_frontend(settings: Settings) -> Result<String> {
    init_tracing();

    let backend = Arc::new(BackendClient::new(settings.backend.clone()));
    let app = build_router(AppState::new(settings, backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("frontend exited: {}", e);
        }
    });

    Ok(format!("http://{}", addr))
}

/// Browser-like client: keeps cookies, never follows redirects (so tests can
/// observe Location headers).
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client can be built")
}
