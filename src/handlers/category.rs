use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::{SUGGEST_LIMIT, TOP_LIMIT},
    models::category::{CategoryListing, CreateCategoryRequest, NewCategory, SuggestParams},
    search::{self, SearchProvider},
    services::{interaction, ranking},
    slug,
};

/// Query parameters of the category view.
#[derive(Debug, Deserialize)]
pub struct CategoryParams {
    /// Optional web search to run alongside the category listing.
    pub query: Option<String>,
}

/// Shows a category and its pages, most viewed first, next to the top categories.
pub async fn show_category(
    State(pool): State<SqlitePool>,
    State(provider): State<Arc<dyn SearchProvider>>,
    Path(category_slug): Path<String>,
    Query(params): Query<CategoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let category = ranking::category_by_slug(&pool, &category_slug).await?;
    let pages = ranking::top_pages_for_category(&pool, category.id, 0).await?;
    let categories = ranking::top_categories(&pool, TOP_LIMIT).await?;

    let results = match params.query.as_deref() {
        Some(query) => search::run_query(provider.as_ref(), query).await,
        None => Vec::new(),
    };

    Ok(Json(json!({
        "category_name": slug::decode(&category_slug),
        "category_name_url": category_slug,
        "category": CategoryListing::from(category),
        "pages": pages,
        "results": results,
        "categories": categories,
    })))
}

/// Adds a category with zero views and likes.
/// Returns 201 when created, 200 when the name already existed.
pub async fn add_category(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (category, created) =
        interaction::add_category(&pool, &NewCategory::new(payload.name, 0, 0)).await?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(CategoryListing::from(category))))
}

/// Adds one like and returns the new count.
pub async fn like_category(
    State(pool): State<SqlitePool>,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let likes = interaction::like_category(&pool, category_id).await?;
    Ok(Json(json!({ "likes": likes })))
}

/// Categories whose name starts with the typed text.
pub async fn suggest_category(
    State(pool): State<SqlitePool>,
    Query(params): Query<SuggestParams>,
) -> Result<impl IntoResponse, AppError> {
    let categories =
        ranking::search_categories_by_prefix(&pool, &params.query, SUGGEST_LIMIT).await?;
    Ok(Json(categories))
}
