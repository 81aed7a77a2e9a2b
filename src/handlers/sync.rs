use axum::{Json, extract::State};

use crate::router::AppState;
use crate::service::sync_agent::{SyncReport, SyncStatus};

/// POST /api/sync -> run one sync now, or report that one is already running.
pub async fn trigger_sync(State(state): State<AppState>) -> Json<SyncReport> {
    Json(state.sync.sync().await)
}

/// GET /api/sync
pub async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.sync.status())
}
