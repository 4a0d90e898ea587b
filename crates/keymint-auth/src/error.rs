//! Authentication error types.
//!
//! The public error surface is intentionally coarse: every credential,
//! token, or grant failure collapses to `Unauthorized` at the HTTP boundary
//! so callers cannot probe *why* an exchange was denied. Backend detail is
//! logged server-side and never returned.

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request body is malformed or missing required fields.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized (logged only).
        message: String,
    },

    /// The presented token is invalid, malformed, or of the wrong kind.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid (logged only).
        message: String,
    },

    /// The presented token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// An error occurred while talking to a storage backend.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration or key material is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this error maps to a 401 response.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::InvalidToken { .. } | Self::TokenExpired
        )
    }

    /// Returns `true` if this error maps to a 5xx response.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::unauthorized("bad password");
        assert_eq!(err.to_string(), "Unauthorized: bad password");

        let err = AuthError::TokenExpired;
        assert_eq!(err.to_string(), "Token expired");

        let err = AuthError::storage("datastore unreachable");
        assert_eq!(err.to_string(), "Storage error: datastore unreachable");
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::unauthorized("x").is_unauthorized());
        assert!(AuthError::invalid_token("x").is_unauthorized());
        assert!(AuthError::TokenExpired.is_unauthorized());
        assert!(!AuthError::invalid_request("x").is_unauthorized());

        assert!(AuthError::storage("x").is_server_error());
        assert!(AuthError::internal("x").is_server_error());
        assert!(!AuthError::unauthorized("x").is_server_error());
    }
}
