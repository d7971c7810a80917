use crate::config::BackendSettings;
use crate::models::{AuthResponse, LinkAttributes, ListResponse, MicrositeAttributes, UserProfile};
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use service_core::observability::TracedClientExt;

/// The product REST API consumed by this frontend.
///
/// Kept behind a trait so the session coordinator and link resolver can be
/// exercised against a mock; `BackendClient` is the production implementation.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `POST /firebase/auth` — exchange an identity-provider token for an
    /// application JWT plus the user record.
    async fn exchange_provider_token(&self, provider_token: &str)
        -> Result<AuthResponse, AppError>;

    /// `POST /auth/local` — credential login (used for the test account).
    async fn login_local(
        &self,
        identifier: &str,
        password: &Secret<String>,
    ) -> Result<AuthResponse, AppError>;

    /// `GET /users/me` with a bearer token.
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, AppError>;

    /// `GET /links/?filters[shortUrl][$eq]={slug}` — first match, if any.
    async fn find_link(&self, slug: &str) -> Result<Option<LinkAttributes>, AppError>;

    /// `GET /microsites/?filters[shortUrl][$eq]={slug}` — first match, if any.
    async fn find_microsite(&self, slug: &str) -> Result<Option<MicrositeAttributes>, AppError>;
}

pub struct BackendClient {
    client: Client,
    settings: BackendSettings,
}

impl BackendClient {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.settings.api_url
    }

    async fn exchange(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<AuthResponse, AppError> {
        let url = format!("{}{}", self.settings.api_url, path);

        let response = self
            .client
            .traced_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                AppError::BadGateway(format!("backend unreachable: {}", e))
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AppError::AuthError(anyhow!(
                "token exchange rejected with status {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(AppError::BadGateway(format!(
                "backend returned status {} for {}",
                status, url
            )));
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AppError::BadGateway(format!("malformed exchange response: {}", e)))
    }

    /// Shared lookup for the two slug-filtered collections.
    async fn find_first<T: serde::de::DeserializeOwned>(
        &self,
        collection: &str,
        slug: &str,
    ) -> Result<Option<T>, AppError> {
        let url = format!(
            "{}/{}/?filters[shortUrl][$eq]={}",
            self.settings.api_url, collection, slug
        );

        let response = self.client.traced_get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to send GET request to {}: {}", url, e);
            AppError::BadGateway(format!("backend unreachable: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadGateway(format!(
                "backend returned status {} for {}",
                status, url
            )));
        }

        let list = response
            .json::<ListResponse<T>>()
            .await
            .map_err(|e| AppError::BadGateway(format!("malformed list response: {}", e)))?;

        Ok(list.data.into_iter().next().map(|entry| entry.attributes))
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn exchange_provider_token(
        &self,
        provider_token: &str,
    ) -> Result<AuthResponse, AppError> {
        self.exchange(
            "/firebase/auth",
            serde_json::json!({ "token": provider_token }),
        )
        .await
    }

    async fn login_local(
        &self,
        identifier: &str,
        password: &Secret<String>,
    ) -> Result<AuthResponse, AppError> {
        self.exchange(
            "/auth/local",
            serde_json::json!({
                "identifier": identifier,
                "password": password.expose_secret(),
            }),
        )
        .await
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, AppError> {
        let url = format!("{}/users/me", self.settings.api_url);

        let response = self
            .client
            .traced_get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send GET request to {}: {}", url, e);
                AppError::BadGateway(format!("backend unreachable: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized(anyhow!(
                "profile fetch rejected with status {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(AppError::BadGateway(format!(
                "backend returned status {} for {}",
                status, url
            )));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| AppError::BadGateway(format!("malformed profile response: {}", e)))
    }

    async fn find_link(&self, slug: &str) -> Result<Option<LinkAttributes>, AppError> {
        self.find_first("links", slug).await
    }

    async fn find_microsite(&self, slug: &str) -> Result<Option<MicrositeAttributes>, AppError> {
        self.find_first("microsites", slug).await
    }
}
