//! Common test utilities for workflow tests.

use std::sync::Arc;
use workflow_tests::{
    browser, frontend_settings, spawn_frontend, spawn_mock_backend, MockBackendState,
    TESTER_IDENTIFIER, TESTER_PASSWORD,
};

pub struct Harness {
    pub backend: Arc<MockBackendState>,
    pub frontend_url: String,
    pub client: reqwest::Client,
}

impl Harness {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.frontend_url, path)
    }
}

/// Mock backend plus real frontend, tester login configured with matching
/// credentials.
pub async fn setup() -> Harness {
    setup_with_tester(Some((TESTER_IDENTIFIER, TESTER_PASSWORD))).await
}

pub async fn setup_with_tester(tester: Option<(&str, &str)>) -> Harness {
    let backend = MockBackendState::with_fixtures();
    let backend_url = spawn_mock_backend(backend.clone())
        .await
        .expect("mock backend can start");
    let frontend_url = spawn_frontend(frontend_settings(&backend_url, tester))
        .await
        .expect("frontend can start");

    Harness {
        backend,
        frontend_url,
        client: browser(),
    }
}
