pub mod app;
pub mod config;
pub mod database;
pub mod web;

mod error;

// re-export
pub use app::{serve, App, AppState};
pub use error::{Error, Result};

use tracing_subscriber::EnvFilter;

/// Pretty, env-filtered tracing for local development.
pub fn init_dbg_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lingolist=debug,tower_http=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .pretty()
        .init();
}

/// Plain single-line tracing for production.
pub fn init_production_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
}
