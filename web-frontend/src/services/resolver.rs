use crate::models::MicrositeAttributes;
use crate::services::backend::BackendApi;
use service_core::error::AppError;
use std::sync::Arc;

/// Outcome of resolving a slug. A slug maps to at most one of these; the
/// link lookup has priority over the microsite lookup.
#[derive(Debug)]
pub enum Resolution {
    /// Slug belongs to a shortened link: redirect to its target.
    Redirect(String),
    /// Slug belongs to a microsite: render it.
    Microsite(Box<MicrositeAttributes>),
    /// Neither: send the visitor back to the landing page.
    NotFound,
}

pub struct LinkResolver {
    backend: Arc<dyn BackendApi>,
}

impl LinkResolver {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }

    /// Two sequential lookups, link first; the microsite query is only
    /// issued when no link matched. Backend failures propagate so the
    /// handler can answer 502 instead of masking an outage as "not found".
    pub async fn resolve(&self, slug: &str) -> Result<Resolution, AppError> {
        if !is_valid_slug(slug) {
            return Ok(Resolution::NotFound);
        }

        if let Some(link) = self.backend.find_link(slug).await? {
            return Ok(Resolution::Redirect(link.long_url));
        }

        if let Some(site) = self.backend.find_microsite(slug).await? {
            return Ok(Resolution::Microsite(Box::new(site)));
        }

        Ok(Resolution::NotFound)
    }
}

/// Slugs are short path segments made of URL-unreserved characters. Anything
/// outside that set could not survive the unescaped filter query anyway and
/// skips the backend round trips entirely.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}
