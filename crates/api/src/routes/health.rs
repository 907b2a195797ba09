//! Liveness check for load balancers and the station kiosks.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when Postgres does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub db_pool: PoolStats,
}

/// Connection usage of the pool every rent and return goes through.
#[derive(Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
    pub max: u32,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = lockerhub_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        db_pool: PoolStats {
            size: state.pool.size(),
            idle: state.pool.num_idle(),
            max: state.pool.options().get_max_connections(),
        },
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
