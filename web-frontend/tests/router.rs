use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use secrecy::Secret;
use service_core::error::AppError;
use std::sync::Arc;
use tower::util::ServiceExt;
use web_frontend::config::{
    BackendSettings, ProviderSettings, ServerSettings, Settings, TelemetrySettings,
};
use web_frontend::models::{AuthResponse, LinkAttributes, MicrositeAttributes, UserProfile};
use web_frontend::services::backend::BackendApi;
use web_frontend::startup::build_router;
use web_frontend::AppState;

/// Canned backend: serves one link and one microsite, no auth.
struct StubBackend {
    link: Option<LinkAttributes>,
    microsite: Option<MicrositeAttributes>,
    down: bool,
}

#[async_trait]
impl BackendApi for StubBackend {
    async fn exchange_provider_token(&self, _: &str) -> Result<AuthResponse, AppError> {
        Err(AppError::AuthError(anyhow!("not configured in this stub")))
    }

    async fn login_local(&self, _: &str, _: &Secret<String>) -> Result<AuthResponse, AppError> {
        Err(AppError::AuthError(anyhow!("not configured in this stub")))
    }

    async fn fetch_profile(&self, _: &str) -> Result<UserProfile, AppError> {
        Err(AppError::Unauthorized(anyhow!("no session")))
    }

    async fn find_link(&self, slug: &str) -> Result<Option<LinkAttributes>, AppError> {
        if self.down {
            return Err(AppError::BadGateway("backend down".to_string()));
        }
        Ok(self
            .link
            .clone()
            .filter(|link| link.short_url == slug))
    }

    async fn find_microsite(&self, slug: &str) -> Result<Option<MicrositeAttributes>, AppError> {
        if self.down {
            return Err(AppError::BadGateway("backend down".to_string()));
        }
        Ok(self
            .microsite
            .clone()
            .filter(|site| site.short_url == slug))
    }
}

fn settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        backend: BackendSettings {
            api_url: "http://localhost:1337/api".to_string(),
            public_site_url: "http://localhost:9020".to_string(),
        },
        provider: ProviderSettings {
            sign_in_url: "https://id.example.com/signin".to_string(),
        },
        tester: None,
        telemetry: TelemetrySettings::default(),
    }
}

fn app_with(backend: StubBackend) -> axum::Router {
    build_router(AppState::new(settings(), Arc::new(backend)))
}

fn healthy_backend() -> StubBackend {
    StubBackend {
        link: Some(LinkAttributes {
            short_url: "abc123".to_string(),
            long_url: "https://example.com/page".to_string(),
        }),
        microsite: Some(MicrositeAttributes {
            short_url: "mysite".to_string(),
            display_name: "Jane".to_string(),
            ..Default::default()
        }),
        down: false,
    }
}

#[tokio::test]
async fn health_check_works() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_generated_request_id() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("request id is set on every response");
    assert!(!request_id.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn caller_supplied_request_id_is_echoed_back() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-42"
    );
}

#[tokio::test]
async fn index_renders() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn sign_in_redirects_to_provider() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://id.example.com/signin"
    );
}

#[tokio::test]
async fn link_slug_redirects_to_target() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/page"
    );
}

#[tokio::test]
async fn microsite_slug_renders_page() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/mysite")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Jane"));
}

#[tokio::test]
async fn unknown_slug_falls_back_to_root() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn backend_outage_answers_bad_gateway() {
    let app = app_with(StubBackend {
        link: None,
        microsite: None,
        down: true,
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn logout_clears_both_cookies() {
    let app = app_with(healthy_backend());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/logout")
                .header(header::COOKIE, "token=jwt-abc; admin=jwt-abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();

    assert!(cookies.iter().any(|c| c.starts_with("token=") && c.contains("Max-Age=0")));
    assert!(cookies.iter().any(|c| c.starts_with("admin=") && c.contains("Max-Age=0")));
}
