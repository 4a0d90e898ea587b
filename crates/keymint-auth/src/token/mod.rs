//! Token issuance, verification, and grant flows.

pub mod claims;
pub mod jwt;
pub mod protocol;
pub mod service;

pub use claims::{TokenClaims, TokenKind};
pub use jwt::{JwtError, JwtService, SigningKeyPair};
pub use protocol::{AuthRequest, GrantType, TokenResponse};
pub use service::TokenService;
