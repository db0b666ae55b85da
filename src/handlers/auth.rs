// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest},
    services::accounts,
    utils::jwt::sign_jwt,
};

/// Registers a new user and its profile.
///
/// Returns 201 Created with the user (excluding password) and the profile.
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let registered = accounts::register(&pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts::authenticate(&pool, &payload.username, &payload.password)
        .await?
        .map_err(|failure| AppError::AuthError(failure.message().to_string()))?;

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
    })))
}
