//! keymint server entry point.
//!
//! Run with `--generate-keys` once to write a fresh RSA key pair to the
//! configured paths, then start normally.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use keymint_auth::{JwtService, SigningKeyPair};
use keymint_server::{AppState, ServerConfig, build_router, run};
use keymint_storage_memory::{MemoryRefreshTokenStorage, MemoryUserDirectory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load().context("failed to load configuration")?;

    if std::env::args().any(|arg| arg == "--generate-keys") {
        return generate_keys(&config);
    }

    let signing_key = load_signing_key(&config)?;
    info!(kid = %signing_key.kid, "Loaded signing key pair");

    let jwt_service = Arc::new(JwtService::new(signing_key));
    let state = AppState::new(
        jwt_service,
        Arc::new(MemoryUserDirectory::new()),
        Arc::new(MemoryRefreshTokenStorage::new()),
        config.auth.clone(),
    );

    let router = build_router(state, &config);
    run(router, &config.listen_addr).await
}

/// Writes a fresh RSA key pair to the configured paths and exits.
fn generate_keys(config: &ServerConfig) -> anyhow::Result<()> {
    let (private_pem, public_pem) =
        SigningKeyPair::generate_pem().context("failed to generate RSA key pair")?;

    std::fs::write(&config.private_key_path, private_pem)
        .with_context(|| format!("failed to write {}", config.private_key_path))?;
    std::fs::write(&config.public_key_path, public_pem)
        .with_context(|| format!("failed to write {}", config.public_key_path))?;

    info!(
        private_key_path = %config.private_key_path,
        public_key_path = %config.public_key_path,
        "Wrote RSA key pair"
    );
    Ok(())
}

/// Loads and parses the signing key pair from the configured PEM files.
fn load_signing_key(config: &ServerConfig) -> anyhow::Result<SigningKeyPair> {
    let private_pem = std::fs::read_to_string(&config.private_key_path).with_context(|| {
        format!(
            "failed to read private key {} (run with --generate-keys to create one)",
            config.private_key_path
        )
    })?;
    let public_pem = std::fs::read_to_string(&config.public_key_path)
        .with_context(|| format!("failed to read public key {}", config.public_key_path))?;

    SigningKeyPair::from_pem(&private_pem, &public_pem).context("failed to parse signing key pair")
}
