//! Wire types for the token endpoint.

use serde::{Deserialize, Serialize};

/// Client-declared grant type selecting which credential exchange to run.
///
/// An unrecognized value deserializes to [`GrantType::Unknown`] and is
/// treated like a denied credential rather than a malformed request, so the
/// endpoint does not leak which grant types exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Username/password exchange; yields access + refresh tokens.
    Password,
    /// Refresh-token exchange; yields a fresh access token.
    RefreshToken,
    /// Anything else.
    #[serde(other)]
    Unknown,
}

/// Request body for `POST /auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthRequest {
    /// Which exchange to perform.
    pub grant_type: GrantType,

    /// Username, required for the password grant.
    #[serde(default)]
    pub username: Option<String>,

    /// Password, required for the password grant.
    #[serde(default)]
    pub password: Option<String>,

    /// Refresh token, required for the refresh grant.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Response envelope for a successful token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,

    /// Always `"bearer"`.
    pub token_type: String,

    /// Access token lifetime in seconds.
    pub expires_in: u64,

    /// Signed refresh token; only present for the password grant
    /// (refresh tokens are not rotated on use).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Subject id the tokens are bound to.
    pub uid: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_type_deserialization() {
        let req: AuthRequest =
            serde_json::from_str(r#"{"grant_type":"password","username":"alice","password":"x"}"#)
                .unwrap();
        assert_eq!(req.grant_type, GrantType::Password);

        let req: AuthRequest =
            serde_json::from_str(r#"{"grant_type":"refresh_token","refresh_token":"t"}"#).unwrap();
        assert_eq!(req.grant_type, GrantType::RefreshToken);
    }

    #[test]
    fn test_unknown_grant_type() {
        let req: AuthRequest =
            serde_json::from_str(r#"{"grant_type":"client_credentials"}"#).unwrap();
        assert_eq!(req.grant_type, GrantType::Unknown);
    }

    #[test]
    fn test_refresh_token_field_omitted_when_absent() {
        let response = TokenResponse {
            access_token: "a".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 300,
            refresh_token: None,
            uid: 1,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("refresh_token"));

        let response = TokenResponse {
            refresh_token: Some("r".to_string()),
            ..response
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"refresh_token\":\"r\""));
    }
}
