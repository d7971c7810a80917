pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use config::Settings;
use services::backend::BackendApi;
use services::resolver::LinkResolver;
use services::session::{SessionCoordinator, TesterAccount};
use std::sync::Arc;

/// Shared application state: the session coordinator and link resolver,
/// both talking to the same backend API.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub coordinator: Arc<SessionCoordinator>,
    pub resolver: Arc<LinkResolver>,
}

impl AppState {
    pub fn new(settings: Settings, backend: Arc<dyn BackendApi>) -> Self {
        let tester = settings
            .tester
            .as_ref()
            .filter(|t| t.enabled)
            .map(|t| TesterAccount {
                identifier: t.identifier.clone(),
                password: t.password.clone(),
            });

        Self {
            coordinator: Arc::new(SessionCoordinator::new(backend.clone(), tester)),
            resolver: Arc::new(LinkResolver::new(backend)),
            settings: Arc::new(settings),
        }
    }
}
