//! # keymint-auth
//!
//! Token lifecycle and authentication protocol for the keymint server.
//!
//! This crate provides:
//! - RSA-signed access and refresh token issuance (password and refresh grants)
//! - Persisted refresh tokens with sliding-window expiry
//! - Bearer token validation middleware for protected routes
//! - Storage capability traits implemented by backend crates
//!
//! ## Modules
//!
//! - [`config`] - Auth service configuration
//! - [`token`] - Claims, JWT signing/verification, grant flows
//! - [`storage`] - Storage traits for refresh tokens and accounts
//! - [`middleware`] - Bearer auth extractor and error responses
//! - [`http`] - Axum handlers for the auth endpoints

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod storage;
pub mod token;
pub mod types;

pub use config::AuthConfig;
pub use error::AuthError;
pub use http::{AuthApiState, RegisterRequest, register_handler, token_handler};
pub use middleware::{AuthState, BearerAuth, Subject};
pub use storage::{RefreshTokenStorage, UserDirectory};
pub use token::claims::{TokenClaims, TokenKind};
pub use token::jwt::{JwtError, JwtService, SigningKeyPair};
pub use token::protocol::{AuthRequest, GrantType, TokenResponse};
pub use token::service::TokenService;
pub use types::{Account, StoredRefreshToken};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
