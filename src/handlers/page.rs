use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Redirect},
};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::page::{AutoAddPageRequest, CreatePageRequest, GotoParams},
    services::interaction::{self, Visit},
};

/// Adds a page to the category named by the slug.
pub async fn add_page(
    State(pool): State<SqlitePool>,
    Path(category_slug): Path<String>,
    Json(payload): Json<CreatePageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (page, created) =
        interaction::add_page_to_category(&pool, &category_slug, &payload.title, &payload.url)
            .await?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(page)))
}

/// Counts the visit and redirects to the page's URL.
pub async fn goto(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Query(params): Query<GotoParams>,
) -> Redirect {
    let page_id = params.page_id.as_deref().and_then(|id| id.trim().parse::<i64>().ok());

    let visit = match page_id {
        Some(page_id) => {
            interaction::track_page_visit(&pool, page_id, &config.fallback_redirect).await
        }
        None => {
            tracing::warn!("Invalid page id: {:?}", params.page_id);
            Visit::Fallback {
                url: config.fallback_redirect.clone(),
            }
        }
    };

    // Rows stored before URLs were validated may not fit in a header.
    if HeaderValue::from_str(visit.target()).is_err() {
        tracing::warn!("Unusable redirect target for {:?}, using fallback", visit);
        return Redirect::to(&config.fallback_redirect);
    }

    Redirect::to(visit.target())
}

/// Files a search result under a category and returns the category's pages.
pub async fn auto_add_page(
    State(pool): State<SqlitePool>,
    Json(payload): Json<AutoAddPageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let pages =
        interaction::auto_add_page(&pool, payload.category_id, &payload.title, &payload.url)
            .await?;
    Ok(Json(pages))
}
