use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use diabetes_risk::{config, create_router, init_tracing, model, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(config.log_format);

    tracing::info!("Diabetes Risk Server starting ({})...", config.environment);

    // Load the model once; it is shared read-only for the life of the process
    let model = model::load_model(&config.model_path)
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;

    let state = AppState {
        model: Arc::new(model),
    };

    let app = create_router(state);

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
