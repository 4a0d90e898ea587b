//! Server configuration.
//!
//! Settings are layered: defaults, then an optional `keymint.toml` next to
//! the binary, then `KEYMINT__`-prefixed environment variables (with `__`
//! separating nesting levels, e.g. `KEYMINT__AUTH__ACCESS_TOKEN_TTL=10m`).

use serde::Deserialize;

use keymint_auth::AuthConfig;

/// Default cap on request body size: 2 MiB.
const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    pub listen_addr: String,

    /// Path to the PEM-encoded RSA private key used for signing.
    pub private_key_path: String,

    /// Path to the PEM-encoded RSA public key used for verification.
    pub public_key_path: String,

    /// Origins allowed by the CORS layer.
    pub cors_allowed_origins: Vec<String>,

    /// Maximum accepted request body size in bytes.
    pub body_limit_bytes: usize,

    /// Token issuance and validation settings.
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9000".to_string(),
            private_key_path: "key.rsa".to_string(),
            public_key_path: "key.rsa.pub".to_string(),
            cors_allowed_origins: vec!["http://localhost:8080".to_string()],
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from file and environment sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value fails to
    /// deserialize.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("keymint").required(false))
            .add_source(config::Environment::with_prefix("KEYMINT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
