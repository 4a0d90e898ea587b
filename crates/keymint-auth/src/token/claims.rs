//! Token claim model.
//!
//! Every token keymint issues embeds one tagged claim set. The `kind`
//! discriminator is what keeps access and refresh tokens from being
//! interchangeable: each consumer checks it and rejects the other variant.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Discriminator between the two token variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Long-lived token whose validity also depends on a persisted store row.
    Refresh,
    /// Short-lived, self-contained token; validity is signature + `exp` only.
    Access,
}

/// Claim set embedded in every signed token.
///
/// `exp == 0` means the token does not expire by embedded claim. Refresh
/// tokens are issued this way; their expiry is enforced through the store's
/// sliding window instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: numeric id of the authenticated principal.
    pub sub: i64,

    /// Token kind discriminator.
    pub kind: TokenKind,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp), 0 for no embedded expiry.
    pub exp: i64,
}

impl TokenClaims {
    /// Creates a claim set issued now.
    ///
    /// `expires_in` of zero produces a token with no embedded expiry.
    #[must_use]
    pub fn new(subject_id: i64, kind: TokenKind, expires_in: std::time::Duration) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let exp = if expires_in.is_zero() {
            0
        } else {
            now + expires_in.as_secs() as i64
        };
        Self {
            sub: subject_id,
            kind,
            iat: now,
            exp,
        }
    }

    /// Returns `true` if the embedded expiry is set and in the past.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.exp != 0 && now.unix_timestamp() > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_access_claims_carry_expiry() {
        let claims = TokenClaims::new(42, TokenKind::Access, Duration::from_secs(300));
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp, claims.iat + 300);
    }

    #[test]
    fn test_refresh_claims_never_expire_by_claim() {
        let claims = TokenClaims::new(42, TokenKind::Refresh, Duration::ZERO);
        assert_eq!(claims.exp, 0);
        assert!(!claims.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_is_expired() {
        let now = OffsetDateTime::now_utc();
        let mut claims = TokenClaims::new(1, TokenKind::Access, Duration::from_secs(60));
        assert!(!claims.is_expired(now));

        claims.exp = now.unix_timestamp() - 1;
        assert!(claims.is_expired(now));
    }

    #[test]
    fn test_kind_serialization() {
        let claims = TokenClaims::new(7, TokenKind::Refresh, Duration::ZERO);
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"kind\":\"refresh\""));

        let back: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }
}
