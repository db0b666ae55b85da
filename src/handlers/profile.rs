use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::TOP_LIMIT,
    services::accounts,
    utils::jwt::Claims,
};

/// Get current user's account, profile and the top categories.
pub async fn get_profile(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let profile = accounts::profile(&pool, claims.user_id()?, TOP_LIMIT).await?;
    Ok(Json(profile))
}
