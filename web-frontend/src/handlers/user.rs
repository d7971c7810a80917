use crate::models::UserProfile;
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tower_sessions::Session;

#[derive(Serialize)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
    pub user_id: i64,
    pub loading: bool,
}

/// `GET /me` — JSON snapshot of the session for page chrome. When a token is
/// held the profile is re-fetched from the backend first; a failed refetch
/// falls back to the stored user rather than erroring the page.
pub async fn me_handler(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let auth = state.coordinator.state(&session).await;

    if !auth.token.is_empty() {
        if let Err(e) = state
            .coordinator
            .refresh_profile(&session, &auth.token)
            .await
        {
            tracing::warn!("Profile refetch failed, serving stored session: {}", e);
        }
    }

    let auth = state.coordinator.state(&session).await;
    Json(SessionSnapshot {
        authenticated: auth.authenticated(),
        user: auth.user,
        user_id: auth.user_id,
        loading: auth.loading,
    })
}
