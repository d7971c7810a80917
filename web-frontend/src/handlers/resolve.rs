use crate::models::{MicrositeAttributes, Social};
use crate::services::metrics::record_resolution;
use crate::services::resolver::Resolution;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use service_core::error::AppError;

#[derive(Template)]
#[template(path = "microsite.html")]
pub struct MicrositeTemplate {
    pub site: MicrositeAttributes,
    pub socials: Vec<Social>,
}

/// `GET /{slug}` — link lookup first, then microsite, then fall back to the
/// landing page. A backend outage answers 502 rather than masquerading as
/// "not found".
pub async fn resolve_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let resolution = state.resolver.resolve(&slug).await.inspect_err(|e| {
        record_resolution("error");
        tracing::error!(slug = %slug, "Slug resolution failed: {}", e);
    })?;

    let response = match resolution {
        Resolution::Redirect(target) => {
            record_resolution("redirect");
            tracing::info!(slug = %slug, target = %target, "Redirecting short link");
            Redirect::temporary(&target).into_response()
        }
        Resolution::Microsite(site) => {
            record_resolution("microsite");
            let socials = site.socials();
            MicrositeTemplate {
                site: *site,
                socials,
            }
            .into_response()
        }
        Resolution::NotFound => {
            record_resolution("not_found");
            Redirect::temporary("/").into_response()
        }
    };

    Ok(response)
}
