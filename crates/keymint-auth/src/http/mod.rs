//! Axum handlers for the auth endpoints.

mod register;
mod token;

pub use register::{RegisterRequest, register_handler};
pub use token::{AuthApiState, token_handler};
