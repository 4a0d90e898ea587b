//! Auth service configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! access_token_ttl = "5m"
//! refresh_idle_window = "30d"
//! store_timeout = "30s"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for token issuance and validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Access token lifetime, embedded in the `exp` claim.
    /// Access tokens are stateless, so this is the only thing bounding them.
    #[serde(with = "humantime_serde")]
    pub access_token_ttl: Duration,

    /// Sliding idle window for refresh tokens. A refresh token dies once the
    /// gap since its last successful use exceeds this window; continued use
    /// keeps it alive indefinitely.
    #[serde(with = "humantime_serde")]
    pub refresh_idle_window: Duration,

    /// Per-call deadline for storage and directory operations. A stalled
    /// backend fails the request with an internal error instead of hanging.
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::from_secs(5 * 60),
            refresh_idle_window: Duration::from_secs(30 * 24 * 3600),
            store_timeout: Duration::from_secs(30),
        }
    }
}
