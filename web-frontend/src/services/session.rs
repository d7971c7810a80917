use crate::models::{SessionState, UserProfile};
use crate::services::backend::BackendApi;
use anyhow::anyhow;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::sync::Arc;
use time::Duration;
use tower_sessions::Session;

/// Application JWT, set on every successful login.
pub const TOKEN_COOKIE: &str = "token";
/// Duplicate JWT marking the auto-provisioned test identity; its presence
/// without a live session triggers tester re-login on the next page load.
pub const ADMIN_COOKIE: &str = "admin";

pub const AUTH_COOKIE_MAX_AGE: Duration = Duration::days(7);

const STATE_KEY: &str = "auth_state";
const FLASH_KEY: &str = "flash";

/// Transient notification surfaced on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flash {
    pub title: String,
    pub description: String,
    pub status: FlashStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FlashStatus {
    Success,
    Error,
}

impl Flash {
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            status: FlashStatus::Success,
        }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            status: FlashStatus::Error,
        }
    }

    /// CSS class hook for the notification banner.
    pub fn class(&self) -> &'static str {
        match self.status {
            FlashStatus::Success => "flash-success",
            FlashStatus::Error => "flash-error",
        }
    }
}

/// Test-account credentials, taken from configuration at startup.
pub struct TesterAccount {
    pub identifier: String,
    pub password: Secret<String>,
}

/// Owns every mutation of the authentication state.
///
/// The state lives as a single session record, and all writers (provider
/// token exchange, tester login, profile refetch, logout) are methods here,
/// so within a request the mutations run sequentially through one code path
/// and each store writes a complete state. Concurrent requests on the same
/// session cookie still resolve last-write-wins at the store.
pub struct SessionCoordinator {
    backend: Arc<dyn BackendApi>,
    tester: Option<TesterAccount>,
}

impl SessionCoordinator {
    pub fn new(backend: Arc<dyn BackendApi>, tester: Option<TesterAccount>) -> Self {
        Self { backend, tester }
    }

    pub fn tester_enabled(&self) -> bool {
        self.tester.is_some()
    }

    /// Current state for this session, signed-out default if none stored.
    pub async fn state(&self, session: &Session) -> SessionState {
        session
            .get::<SessionState>(STATE_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    async fn store(&self, session: &Session, state: &SessionState) -> Result<(), AppError> {
        session
            .insert(STATE_KEY, state)
            .await
            .map_err(|e| AppError::InternalError(anyhow!("failed to persist session: {}", e)))
    }

    pub async fn set_flash(&self, session: &Session, flash: Flash) {
        if let Err(e) = session.insert(FLASH_KEY, flash).await {
            tracing::warn!("Failed to store flash notification: {}", e);
        }
    }

    pub async fn take_flash(&self, session: &Session) -> Option<Flash> {
        session.remove::<Flash>(FLASH_KEY).await.ok().flatten()
    }

    fn auth_cookie(name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .max_age(AUTH_COOKIE_MAX_AGE)
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }

    fn removal_cookie(name: &'static str) -> Cookie<'static> {
        let mut cookie = Cookie::new(name, "");
        cookie.set_path("/");
        cookie
    }

    /// Provider-callback exchange: turn an identity-provider token into an
    /// application JWT plus user record, persist the JWT into the `token`
    /// cookie and update the session.
    ///
    /// On failure the session user is left untouched, `loading` ends up
    /// false, and the caller gets a surfaced error instead of a silently
    /// swallowed one.
    pub async fn establish(
        &self,
        session: &Session,
        mut jar: CookieJar,
        provider_token: &str,
    ) -> (CookieJar, Result<UserProfile, AppError>) {
        let mut state = self.state(session).await;
        state.loading = true;

        let result = match self.backend.exchange_provider_token(provider_token).await {
            Ok(auth) => {
                jar = jar.add(Self::auth_cookie(TOKEN_COOKIE, auth.jwt.clone()));
                state.user_id = auth.user.id;
                state.token = auth.jwt;
                state.user = Some(auth.user.clone());

                tracing::info!(user_id = auth.user.id, "Session established via provider");
                self.set_flash(
                    session,
                    Flash::success("Welcome aboard.", "You can now create your own microsites!"),
                )
                .await;
                Ok(auth.user)
            }
            Err(e) => {
                tracing::warn!("Provider token exchange failed: {}", e);
                self.set_flash(
                    session,
                    Flash::error("Sign-in failed.", "We could not verify your account. Try again."),
                )
                .await;
                Err(e)
            }
        };

        state.loading = false;
        if let Err(e) = self.store(session, &state).await {
            return (jar, Err(e));
        }

        (jar, result)
    }

    /// Credential login as the configured test account. Sets both the
    /// `token` and `admin` cookies; `loading` is false on every exit path,
    /// success or not.
    pub async fn login_as_tester(
        &self,
        session: &Session,
        mut jar: CookieJar,
    ) -> (CookieJar, Result<UserProfile, AppError>) {
        let Some(tester) = &self.tester else {
            return (
                jar,
                Err(AppError::BadRequest(anyhow!("tester login is not enabled"))),
            );
        };

        let mut state = self.state(session).await;
        state.loading = true;

        let result = match self
            .backend
            .login_local(&tester.identifier, &tester.password)
            .await
        {
            Ok(auth) => {
                jar = jar.add(Self::auth_cookie(TOKEN_COOKIE, auth.jwt.clone()));
                jar = jar.add(Self::auth_cookie(ADMIN_COOKIE, auth.jwt.clone()));
                state.user_id = auth.user.id;
                state.token = auth.jwt;
                state.user = Some(auth.user.clone());

                tracing::info!(user_id = auth.user.id, "Logged in as test account");
                self.set_flash(
                    session,
                    Flash::success("Welcome aboard.", "You can now create your own microsites!"),
                )
                .await;
                Ok(auth.user)
            }
            Err(e) => {
                tracing::warn!("Tester login failed: {}", e);
                self.set_flash(
                    session,
                    Flash::error("Test login failed.", "The test account is unavailable."),
                )
                .await;
                Err(e)
            }
        };

        state.loading = false;
        if let Err(e) = self.store(session, &state).await {
            return (jar, Err(e));
        }

        (jar, result)
    }

    /// Re-fetch the user record for a bearer token and update the session.
    pub async fn refresh_profile(
        &self,
        session: &Session,
        token: &str,
    ) -> Result<UserProfile, AppError> {
        let mut state = self.state(session).await;
        state.loading = true;
        self.store(session, &state).await?;

        let result = self.backend.fetch_profile(token).await;
        if let Ok(user) = &result {
            state.user_id = user.id;
            state.user = Some(user.clone());
        }

        state.loading = false;
        self.store(session, &state).await?;

        result
    }

    /// Clear both auth cookies, then the session record. Cookie removal comes
    /// first and is not rolled back if anything after it fails.
    pub async fn logout(&self, session: &Session, mut jar: CookieJar) -> CookieJar {
        jar = jar.remove(Self::removal_cookie(TOKEN_COOKIE));
        jar = jar.remove(Self::removal_cookie(ADMIN_COOKIE));

        session.clear().await;
        self.set_flash(
            session,
            Flash::success("See you another time.", "Signed out successfully"),
        )
        .await;

        tracing::info!("Session terminated");
        jar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_cookie_is_scoped_to_root_for_seven_days() {
        let cookie = SessionCoordinator::auth_cookie(TOKEN_COOKIE, "jwt-abc".to_string());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(AUTH_COOKIE_MAX_AGE));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.value(), "jwt-abc");
    }

    #[test]
    fn removal_cookie_targets_the_same_path() {
        let cookie = SessionCoordinator::removal_cookie(ADMIN_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.value(), "");
    }

    #[test]
    fn flash_classes_distinguish_outcomes() {
        assert_eq!(Flash::success("a", "b").class(), "flash-success");
        assert_eq!(Flash::error("a", "b").class(), "flash-error");
    }
}
