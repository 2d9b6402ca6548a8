//! Health check endpoint.
//!
//! Reports `"ok"` while the change log is gap-free, `"inconsistent"`
//! otherwise. Both states answer 200 so load balancers keep routing; the
//! status field is for operators.

use crate::reconciler::{ModelSnapshot, Reconciler};
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// `ok` or `inconsistent`.
    pub status: &'static str,
    /// Server version.
    pub version: &'static str,
    /// Client ids handed out.
    pub clients: u64,
    /// Number of documents.
    pub documents: usize,
    /// Newest log version.
    pub log_head: u64,
    /// Records in the log.
    pub log_records: usize,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

impl HealthStatus {
    fn from_snapshot(snapshot: ModelSnapshot, clients: u64, uptime_seconds: u64) -> Self {
        Self {
            status: if snapshot.is_consistent() {
                "ok"
            } else {
                "inconsistent"
            },
            version: env!("CARGO_PKG_VERSION"),
            clients,
            documents: snapshot.documents,
            log_head: snapshot.head.value(),
            log_records: snapshot.records,
            uptime_seconds,
        }
    }
}

/// `GET /health`
pub async fn health_handler(
    Extension(reconciler): Extension<Arc<Reconciler>>,
) -> Json<HealthStatus> {
    let snapshot = reconciler.snapshot().await;
    Json(HealthStatus::from_snapshot(
        snapshot,
        reconciler.clients_connected(),
        reconciler.uptime().as_secs(),
    ))
}
