mod adapters;
mod application;
mod domain;
mod services;

use std::sync::Arc;

use adapters::{
    router::create_router,
    state::{AppState, UploadLimits},
};
use domain::config::local::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = ServerConfig::from_env().expect("ERROR: invalid server configuration");

    tracing::info!(
        "Storing files in {} ({:?} provider)",
        config.data_dir.display(),
        config.storage_provider
    );

    let app_state = AppState {
        storage_service: services::create_storage_service(
            &config.storage_provider,
            &config.data_dir,
        ),
        document_editor: Arc::new(services::PassthroughEditor),
        limits: UploadLimits {
            max_file_bytes: config.max_upload_bytes,
            max_json_bytes: config.max_json_bytes,
        },
    };

    let router = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("PDF API listening on http://0.0.0.0:{}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
