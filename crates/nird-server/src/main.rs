//! `nird-server` binary: parse flags, load data, serve until Ctrl+C or SIGTERM

use anyhow::Context;
use nird_server::{command, routes, telemetry, AppState, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let config = ServerConfig::from_matches(&matches)?;

    telemetry::init(&config.log_level)?;

    info!("Loading podium data from {}", config.catalog_path.display());
    let state = AppState::load(&config).context("failed to load podium data")?;

    let api = routes::api(state, &config.frontend_url);
    let addr = config.socket_addr();

    let (bound, server) = warp::serve(api)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("NIRD API listening on http://{bound}");
    info!("CORS origin: {}", config.frontend_url);

    server.await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
