//! Diabetes Risk Assessment Server
//!
//! Serves an eight-field health form, encodes submissions into a fixed-order
//! feature vector and classifies them with a model loaded once at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 DIABETES RISK SERVER                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────┐  │
//! │  │  Form /   │──▶│  Assessment  │──▶│  ModelHandle    │  │
//! │  │  JSON API │   │  (encode)    │   │  (Classifier)   │  │
//! │  │  (Axum)   │◀──│  (outcome)   │◀──│  json | onnx    │  │
//! │  └───────────┘   └──────────────┘   └─────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod assessment;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod render;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use config::LogFormat;
use model::ModelHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelHandle>,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Interactive form
        .route("/", get(handlers::form::show).post(handlers::form::submit))
        .route("/health", get(handlers::health::check))

        // JSON API
        .route("/api/v1/assess", post(handlers::assess::submit))
        .route("/api/v1/model", get(handlers::model::status))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

/// Initialize logging. `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "diabetes_risk=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
