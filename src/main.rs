//! Workforce Engine HTTP server.
//!
//! Environment:
//!
//! - `WORKFORCE_CONFIG_DIR`: configuration directory (default `./config/default`)
//! - `WORKFORCE_BIND_ADDR`: overrides `server.bind_addr` from `engine.yaml`
//! - `WORKFORCE_LOG_JSON`: emit JSON log lines when true
//! - `RUST_LOG`: log filter (default `info`)

use std::env;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use workforce_engine::api::{AppState, create_router};
use workforce_engine::config::ConfigLoader;

const DEFAULT_CONFIG_DIR: &str = "./config/default";

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("WORKFORCE_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config_dir = env::var("WORKFORCE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)
        .map_err(|e| {
            error!(config_dir = %config_dir, error = %e, "Failed to load configuration");
            e.to_string()
        })?
        .into_config();

    let bind_addr = env::var("WORKFORCE_BIND_ADDR").unwrap_or_else(|_| config.server().bind_addr.clone());
    info!(
        config_dir = %config_dir,
        roster_size = config.roster().len(),
        late_cutoff = %config.attendance().late_cutoff,
        "Configuration loaded"
    );

    let router = create_router(AppState::from_config(config));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {}", bind_addr, e))?;
    info!(bind_addr = %bind_addr, "Workforce engine listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| format!("server error: {}", e))
}
