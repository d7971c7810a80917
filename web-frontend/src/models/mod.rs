pub mod microsite;
pub mod user;

pub use microsite::{Entry, LinkAttributes, ListResponse, MicrositeAttributes, Social};
pub use user::{AuthResponse, SessionState, UserProfile};
