use crate::services::session::ADMIN_COOKIE;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tower_sessions::Session;

/// Auto re-login as the test identity: a page request arriving with an
/// `admin` cookie but no session user is logged in again before rendering.
/// Failures are logged and the page is served signed-out; the coordinator
/// has already stored a visible failure flash.
pub async fn tester_bootstrap_middleware(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let current = state.coordinator.state(&session).await;
    if current.user.is_some() || jar.get(ADMIN_COOKIE).is_none() {
        return next.run(request).await;
    }
    if !state.coordinator.tester_enabled() {
        return next.run(request).await;
    }

    let (jar, outcome) = state.coordinator.login_as_tester(&session, jar).await;
    if let Err(e) = outcome {
        tracing::warn!("Automatic tester re-login failed: {}", e);
    }

    (jar, next.run(request).await).into_response()
}
