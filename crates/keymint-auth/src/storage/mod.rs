//! Storage capability traits.
//!
//! The auth core talks to its backends only through these traits. The
//! policy of how and when they are called lives in
//! [`TokenService`](crate::token::service::TokenService); the storage
//! engines themselves live in backend crates (e.g. `keymint-storage-memory`).

mod refresh_token;
mod user;

pub use refresh_token::RefreshTokenStorage;
pub use user::UserDirectory;
