//! Domain types shared across the auth crate.

mod account;
mod refresh_token;

pub use account::Account;
pub use refresh_token::StoredRefreshToken;
