use crate::handlers::{quotes, sync, transfer};
use crate::service::presenter::PageState;
use crate::service::quotes_actor::QuotesHandle;
use crate::service::sync_agent::SyncAgent;
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub quotes: QuotesHandle,
    pub sync: Arc<SyncAgent>,
    pub page: PageState,
}

impl AppState {
    pub fn new(quotes: QuotesHandle, sync: Arc<SyncAgent>, page: PageState) -> Self {
        Self {
            quotes,
            sync,
            page,
        }
    }
}

pub fn quotes_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/quotes",
            get(quotes::list_quotes).post(quotes::add_quote),
        )
        .route("/api/quotes/next", post(quotes::next_quote))
        .route("/api/categories", get(quotes::list_categories))
        .route("/api/filter", put(quotes::set_filter))
        .route("/api/page", get(quotes::page))
        .route("/api/export", get(transfer::export_quotes))
        .route("/api/import", post(transfer::import_quotes))
        .route("/api/sync", get(sync::sync_status).post(sync::trigger_sync))
        .with_state(state)
}
