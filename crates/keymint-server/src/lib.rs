//! # keymint-server
//!
//! HTTP server wiring for keymint: configuration loading, key material,
//! router assembly, and process lifecycle. The auth semantics live in
//! `keymint-auth`; this crate only hosts them.

pub mod config;
pub mod server;

pub use config::ServerConfig;
pub use server::{AppState, build_router, run};
