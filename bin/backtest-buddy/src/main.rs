use tracing::info;
use tracing_subscriber::EnvFilter;

use common::Config;
use strategy::{StrategyFileConfig, StrategyRegistry};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    info!(port = cfg.server_port, "BackTest Buddy starting");

    // ── Strategy registry ─────────────────────────────────────────────────────
    let registry = match &cfg.strategy_config_path {
        Some(path) => {
            let file = StrategyFileConfig::load(path)
                .unwrap_or_else(|e| panic!("Failed to load strategy config: {e}"));
            StrategyRegistry::from_config(&file)
                .unwrap_or_else(|e| panic!("Invalid strategy config at '{path}': {e}"))
        }
        None => {
            info!("No STRATEGY_CONFIG_PATH set, using built-in strategy parameters");
            StrategyRegistry::default()
        }
    };
    info!(strategies = ?registry.names().collect::<Vec<_>>(), "Strategy registry ready");

    // ── HTTP server ───────────────────────────────────────────────────────────
    let state = api::AppState::new(registry);
    tokio::select! {
        result = api::serve(state, cfg.server_port) => {
            if let Err(e) = result {
                panic!("HTTP server failed: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting.");
        }
    }
}
