//! Health check endpoint

use std::sync::Arc;
use std::time::SystemTime;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use interaction_types::ComponentActivatedEvent;
use interaction_waiters::WaiterRegistry;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Registry entries, counted per control identifier
    pub pending_waiters: usize,
    pub uptime_secs: u64,
}

/// Shared application state for health checks
#[derive(Clone)]
pub struct AppState {
    pub start_time: SystemTime,
    pub registry: Arc<WaiterRegistry<ComponentActivatedEvent>>,
}

impl AppState {
    pub fn new(registry: Arc<WaiterRegistry<ComponentActivatedEvent>>) -> Self {
        Self {
            start_time: SystemTime::now(),
            registry,
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();

    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            pending_waiters: state.registry.len(),
            uptime_secs: uptime,
        }),
    )
}

async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start the health check server
pub async fn start_health_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
