//! Router assembly and server lifecycle.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRef},
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use keymint_auth::{
    AuthApiState, AuthConfig, AuthState, BearerAuth, JwtService, RefreshTokenStorage,
    TokenService, UserDirectory, register_handler, token_handler,
};

use crate::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// State for the token and register handlers.
    pub auth_api: AuthApiState,

    /// State for the bearer token extractor.
    pub auth: AuthState,
}

impl AppState {
    /// Wires the token service and handler states from their collaborators.
    #[must_use]
    pub fn new(
        jwt_service: Arc<JwtService>,
        users: Arc<dyn UserDirectory>,
        refresh_tokens: Arc<dyn RefreshTokenStorage>,
        auth_config: AuthConfig,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(
            jwt_service.clone(),
            users,
            refresh_tokens,
            auth_config,
        ));
        Self {
            auth_api: AuthApiState::new(token_service),
            auth: AuthState::new(jwt_service),
        }
    }
}

impl FromRef<AppState> for AuthApiState {
    fn from_ref(state: &AppState) -> Self {
        state.auth_api.clone()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Response body for `GET /me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Id of the authenticated subject.
    pub uid: i64,
}

/// Builds the application router with all routes and middleware layers.
#[must_use]
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/auth", post(token_handler::<AppState>))
        .route("/auth/register", post(register_handler::<AppState>))
        .route("/me", get(me_handler));

    apply_layers(router, config).with_state(state)
}

/// Applies the middleware stack to a router.
///
/// A panicking handler is converted to a plain 500 instead of tearing down
/// the connection.
fn apply_layers(router: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
}

/// Liveness probe.
async fn healthz_handler() -> &'static str {
    "OK"
}

/// Returns the id of the authenticated subject.
async fn me_handler(BearerAuth(subject): BearerAuth) -> Json<MeResponse> {
    Json(MeResponse { uid: subject.id })
}

/// Builds the CORS layer from the configured origin list.
///
/// Unparsable origins are skipped with a warning rather than failing
/// startup.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin, error = %e, "Skipping unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Binds the listener and serves the router until shutdown is signalled.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails while
/// running.
pub async fn run(router: Router, listen_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
