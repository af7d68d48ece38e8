//! HTTP API for car price prediction
//!
//! ## Endpoints
//!
//! - `GET /` - Landing page with a prediction form
//! - `GET /health` - Liveness check
//! - `POST /predict` - Predict the price for one JSON record

pub mod handlers;

use crate::core::bundle::ModelBundle;
use crate::utils::error::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    bundle: Arc<ModelBundle>,
}

impl AppState {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
        }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home_handler))
        .route("/health", get(handlers::health_handler))
        .route("/predict", post(handlers::predict_handler))
        .with_state(state)
}

pub async fn serve_with_shutdown<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🚀 Listening on http://{}", addr);
    }

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
