//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `postgres` or `memory`.
    pub storage: &'static str,
    pub timestamp: String,
}

/// GET /api/health
///
/// 503 when the database is configured but does not answer a ping.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (storage, healthy) = storage_status(&state).await;

    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

#[cfg(feature = "postgres")]
async fn storage_status(state: &AppState) -> (&'static str, bool) {
    match &state.db {
        Some(db) => match db.main.ping().await {
            Ok(()) => ("postgres", true),
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                ("postgres", false)
            }
        },
        None => ("memory", true),
    }
}

#[cfg(not(feature = "postgres"))]
async fn storage_status(_state: &AppState) -> (&'static str, bool) {
    ("memory", true)
}
