pub mod app;
pub mod auth;
pub mod metrics;
pub mod resolve;
pub mod user;
