use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::search::{self, SearchProvider};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// Runs a web search. Failures and blank queries give an empty list.
pub async fn run_search(
    State(provider): State<Arc<dyn SearchProvider>>,
    Json(payload): Json<SearchRequest>,
) -> impl IntoResponse {
    Json(search::run_query(provider.as_ref(), &payload.query).await)
}
