use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::service::quote_store::ImportSummary;
use crate::service::transfer::EXPORT_FILE_NAME;
use crate::{QuoteError, router::AppState};

/// GET /api/export -> `quotes.json` as an attachment.
pub async fn export_quotes(State(state): State<AppState>) -> Result<Response, QuoteError> {
    let body = state.quotes.export().await?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /api/import -> the request body is the uploaded file's contents.
pub async fn import_quotes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportSummary>, QuoteError> {
    Ok(Json(state.quotes.import(body.to_vec()).await?))
}
