use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use waifu_proxy::{create_app, AppResult, AppState, Config};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting waifu.pics API proxy");

    // Load configuration
    let config = Config::new()?;
    info!("Configuration loaded, upstream: {}", config.upstream.api_url);
    if let Some(proxy) = &config.upstream.proxy {
        info!("Routing upstream traffic through proxy {}", proxy);
    }

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| waifu_proxy::AppError::Config(format!("Invalid HOST '{}': {}", config.server.host, e)))?;
    let addr = SocketAddr::from((host, config.server.port));

    // Create shared application state
    let app = create_app(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server is listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            warn!("Received SIGTERM, shutting down gracefully");
        },
    }
}
