use crate::services::session::Flash;
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub authenticated: bool,
    pub user_name: Option<String>,
    pub flash: Option<Flash>,
}

pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let auth = state.coordinator.state(&session).await;
    let flash = state.coordinator.take_flash(&session).await;

    IndexTemplate {
        authenticated: auth.authenticated(),
        user_name: auth.user.as_ref().map(|u| u.display_name()),
        flash,
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
