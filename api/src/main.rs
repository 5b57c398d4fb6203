use anyhow::Context;
use social_analytics_api::{AppState, app, config::Config};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::load().context("Environment misconfigured")?;
    config.log_status();

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server running on http://{}", addr);
    info!("API Endpoints:");
    info!("  GET    /health                              - Health check");
    info!("  POST   /api/auth/authenticate               - Authenticate with upstream");
    info!("  GET    /api/auth/status                     - Authentication status");
    info!("  GET    /api/auth/credentials                - Server credential status");
    info!("  GET    /api/social/users                    - Top users and stats");
    info!("  GET    /api/social/posts?type=&page=        - Popular or latest posts");
    info!("  GET    /api/social/posts/:id/comments       - Comments for a post");
    info!("  GET    /api/social/users/:id/posts          - Posts for a user");
    info!("  GET    /api/social/stats                    - Summary statistics");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
