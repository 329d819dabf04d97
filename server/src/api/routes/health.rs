//! Health check endpoint
//!
//! Reports the loaded snapshot alongside liveness, so a probe can tell an
//! empty directory from a service that never loaded one.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::directory::Snapshot;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Warehouse table the directory snapshot was loaded from
    pub snapshot_source: String,
    /// Rows in the loaded snapshot
    pub snapshot_rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy and serving a snapshot", body = HealthResponse)
    )
)]
pub async fn health(State(snapshot): State<Arc<Snapshot>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            snapshot_source: snapshot.source.clone(),
            snapshot_rows: snapshot.len(),
            loaded_at: snapshot.loaded_at,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directory::Record;

    #[tokio::test]
    async fn health_reports_the_loaded_snapshot() {
        let snapshot = Arc::new(Snapshot::new("personnel", vec![Record::default()]));
        let response = health(State(snapshot)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["snapshot_source"], "personnel");
        assert_eq!(body["snapshot_rows"], 1);
        assert!(body["loaded_at"].is_string());
    }
}
