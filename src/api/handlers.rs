use crate::db::PgLedgerStore;
use crate::models::{ComparisonLine, LedgerUpdate, ListScope, ReconcileStats};
use crate::service::ReconcileService;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type SharedService = Arc<ReconcileService<PgLedgerStore>>;

/// Request body: scopes to reconcile
#[derive(Debug, Deserialize)]
pub struct BatchReconcileRequest {
    pub scopes: Vec<ListScope>,
}

#[derive(Debug, Deserialize)]
pub struct ScopeRequest {
    pub scope: ListScope,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub message: String,
    pub stats: Option<Vec<ReconcileStats>>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub message: String,
    pub stats: Option<ReconcileStats>,
    pub updates: Option<Vec<LedgerUpdate>>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub message: String,
    pub lines: Option<Vec<ComparisonLine>>,
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Reconcile and persist each scope in order
pub async fn reconcile_batch(
    State(service): State<SharedService>,
    Json(req): Json<BatchReconcileRequest>,
) -> Response {
    match service.reconcile_many(&req.scopes).await {
        Ok(stats) => {
            let updated: usize = stats.iter().map(|s| s.updated).sum();
            let skipped: usize = stats.iter().map(|s| s.skipped_rows).sum();
            let response = ReconcileResponse {
                success: true,
                message: format!(
                    "Reconciled {} lists, {} items updated, {} rows skipped",
                    req.scopes.len(),
                    updated,
                    skipped
                ),
                stats: Some(stats),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = ReconcileResponse {
                success: false,
                message: format!("Error: {}", e),
                stats: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}

/// Update set for one scope, not persisted
pub async fn reconcile_preview(
    State(service): State<SharedService>,
    Json(req): Json<ScopeRequest>,
) -> Response {
    match service.preview(&req.scope).await {
        Ok(outcome) => {
            let response = PreviewResponse {
                success: true,
                message: format!("{} items would change", outcome.updates.len()),
                stats: Some(outcome.stats),
                updates: Some(outcome.updates),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = PreviewResponse {
                success: false,
                message: format!("Error: {}", e),
                stats: None,
                updates: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}

pub async fn compare(
    State(service): State<SharedService>,
    Json(req): Json<ScopeRequest>,
) -> Response {
    match service.compare(&req.scope).await {
        Ok(lines) => {
            let response = CompareResponse {
                success: true,
                message: format!("Compared {} items", lines.len()),
                lines: Some(lines),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = CompareResponse {
                success: false,
                message: format!("Error: {}", e),
                lines: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
