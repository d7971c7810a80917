use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;
use validator::Validate;

/// `GET /login` — hand the browser to the identity provider's hosted
/// sign-in page. No session state changes here; the provider sends the
/// browser back with a token for `POST /auth/session`.
pub async fn sign_in_redirect(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("Redirecting to identity provider sign-in");
    Redirect::to(&state.settings.provider.sign_in_url)
}

#[derive(Deserialize, Validate)]
pub struct EstablishRequest {
    #[validate(length(min = 1, message = "provider token must not be empty"))]
    pub provider_token: String,
}

/// `POST /auth/session` — exchange the provider token for an application
/// JWT and establish the session. Success and failure both land back on the
/// index page; the flash notification carries the outcome.
pub async fn establish_session_handler(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(payload): Form<EstablishRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (jar, outcome) = state
        .coordinator
        .establish(&session, jar, &payload.provider_token)
        .await;

    if let Err(e) = outcome {
        tracing::warn!("Session establishment failed: {}", e);
    }

    Ok((jar, Redirect::to("/")))
}

/// `POST /auth/tester` — credential login as the configured test account.
pub async fn tester_login_handler(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, outcome) = state.coordinator.login_as_tester(&session, jar).await;

    if let Err(e) = outcome {
        tracing::warn!("Tester login failed: {}", e);
    }

    (jar, Redirect::to("/"))
}

/// `GET /logout` — clear both auth cookies and the session, then return to
/// the landing page.
pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = state.coordinator.logout(&session, jar).await;
    (jar, Redirect::to("/"))
}
