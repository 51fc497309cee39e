use std::net::SocketAddr;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use translate_gateway::{create_app, AppState, Config};

const DEFAULT_LOG_FILTER: &str = "translate_gateway=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config();

    let app_state = AppState::new(config.clone()).await?;
    let app = create_app(app_state);

    let ip = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|e| anyhow::anyhow!("Invalid server.host {:?}: {}", config.server.host, e))?;
    let addr = SocketAddr::new(ip, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// First config file that loads, or the built-in defaults
fn load_config() -> Config {
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    for path in &config_paths {
        match Config::load(path) {
            Ok(config) => {
                info!("Loaded configuration from: {}", path);
                return config;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }

    warn!(
        "No configuration file found (tried {:?}), using defaults",
        config_paths
    );
    Config::default()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
