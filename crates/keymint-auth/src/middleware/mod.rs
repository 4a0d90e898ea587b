//! Bearer token authentication for protected routes.

mod auth;
mod error;

pub use auth::{AuthState, BearerAuth, Subject};
