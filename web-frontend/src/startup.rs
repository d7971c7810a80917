use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, request_span},
};
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    auth::{establish_session_handler, logout_handler, sign_in_redirect, tester_login_handler},
    resolve::resolve_slug_handler,
    user::me_handler,
};
use crate::middleware::auth::tester_bootstrap_middleware;
use crate::services::metrics::metrics_middleware;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    Router::new()
        .route(
            "/",
            get(index).layer(from_fn_with_state(
                state.clone(),
                tester_bootstrap_middleware,
            )),
        )
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/login", get(sign_in_redirect))
        .route("/logout", get(logout_handler))
        .route("/auth/session", post(establish_session_handler))
        .route("/auth/tester", post(tester_login_handler))
        .route(
            "/me",
            get(me_handler).layer(from_fn_with_state(
                state.clone(),
                tester_bootstrap_middleware,
            )),
        )
        .route("/:slug", get(resolve_slug_handler))
        .nest_service("/static", ServeDir::new("web-frontend/static"))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        // Span carries the id resolved by request_id_middleware below, which
        // therefore has to sit outside the trace layer.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| request_span(request)),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .with_state(state)
}
