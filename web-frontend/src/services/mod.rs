pub mod backend;
pub mod metrics;
pub mod resolver;
pub mod session;
