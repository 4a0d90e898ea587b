//! # keymint-storage-memory
//!
//! In-memory implementations of the keymint storage traits, suitable for
//! development, tests, and single-node deployments. Backends live in their
//! own crate so the auth core stays storage-agnostic.

mod refresh_token;
mod user;

pub use refresh_token::MemoryRefreshTokenStorage;
pub use user::MemoryUserDirectory;
