//! Spaces Server - Main entry point

use std::sync::Arc;

use spaces_core::{
    api::{self, AppState, JwtVerifier},
    config::Config,
    source::{Fixtures, InMemoryStore, StaticMemberClusters},
    telemetry,
    workspace::SpaceLister,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = match std::env::var("SPACES_CONFIG") {
        Ok(path) => Config::from_file(&path)?,
        Err(_) => Config::load()?,
    };

    let metrics = telemetry::init_telemetry(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        public_viewer = config.public_viewer.enabled,
        "Starting Spaces Server"
    );

    let (store, members) = match config.store.fixtures_path {
        Some(ref path) => Fixtures::from_file(path)?.into_sources(),
        None => {
            tracing::warn!("No fixtures configured, serving an empty store");
            (
                Arc::new(InMemoryStore::new()),
                Arc::new(StaticMemberClusters::new()),
            )
        }
    };

    let lister = SpaceLister::new(
        store.clone(),
        store,
        members,
        config.public_viewer.clone(),
    );
    let state = AppState::new(lister, JwtVerifier::new(&config.auth), metrics);
    let app = api::build_router(state);

    let addr = config.bind_address();
    tracing::info!(address = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}
