use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::types::{CategoryFilter, CategoryOption, NewQuote, PageSnapshot, Quote};
use crate::{QuoteError, router::AppState};

#[derive(Debug, Deserialize)]
pub struct FilterBody {
    pub category: String,
}

/// GET /api/quotes
pub async fn list_quotes(State(state): State<AppState>) -> Result<Json<Vec<Quote>>, QuoteError> {
    Ok(Json(state.quotes.list().await?))
}

/// POST /api/quotes -> 201 with the stored quote, 422 when a field is blank.
pub async fn add_quote(
    State(state): State<AppState>,
    Json(body): Json<NewQuote>,
) -> Result<Response, QuoteError> {
    let quote = state.quotes.add(body).await?;
    Ok((StatusCode::CREATED, Json(quote)).into_response())
}

/// POST /api/quotes/next -> a fresh random quote for the current filter.
pub async fn next_quote(
    State(state): State<AppState>,
) -> Result<Json<PageSnapshot>, QuoteError> {
    state.quotes.render().await?;
    Ok(Json(state.page.snapshot()))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryOption>>, QuoteError> {
    Ok(Json(state.quotes.categories().await?))
}

/// PUT /api/filter
pub async fn set_filter(
    State(state): State<AppState>,
    Json(body): Json<FilterBody>,
) -> Result<Json<PageSnapshot>, QuoteError> {
    state
        .quotes
        .set_filter(CategoryFilter::from(body.category))
        .await?;
    Ok(Json(state.page.snapshot()))
}

/// GET /api/page
pub async fn page(State(state): State<AppState>) -> Json<PageSnapshot> {
    Json(state.page.snapshot())
}
