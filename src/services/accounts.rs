use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    models::user::{CreateUserRequest, ProfileResponse, RegisteredUser, User, UserProfile},
    services::{
        errors::{ServiceError, ServiceResult},
        ranking,
    },
    utils::hash::{hash_password, verify_password},
};

const USER_COLUMNS: &str = "id, username, password, email, is_active, created_at";

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    BlankCredentials,
    InvalidCredentials,
    Disabled,
}

impl LoginFailure {
    pub fn message(self) -> &'static str {
        match self {
            LoginFailure::BlankCredentials => "Enter a valid username or password",
            LoginFailure::InvalidCredentials => "Invalid username or password",
            LoginFailure::Disabled => "Your rango account is disabled",
        }
    }
}

/// Creates the account and its profile in one transaction.
pub async fn register(pool: &SqlitePool, request: &CreateUserRequest) -> ServiceResult<RegisteredUser> {
    request.validate()?;

    let hashed_password =
        hash_password(&request.password).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, password, email) VALUES (?, ?, ?) RETURNING {USER_COLUMNS}"
    ))
    .bind(&request.username)
    .bind(&hashed_password)
    .bind(&request.email)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return ServiceError::Conflict(format!(
                    "Username '{}' already exists",
                    request.username
                ));
            }
        }
        tracing::error!("Failed to register user: {:?}", e);
        ServiceError::Database(e)
    })?;

    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (user_id, website, picture)
        VALUES (?, ?, ?)
        RETURNING id, user_id, website, picture
        "#,
    )
    .bind(user.id)
    .bind(&request.website)
    .bind(&request.picture)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok(RegisteredUser { user, profile })
}

/// Checks credentials. The outer error is a storage failure; the inner one
/// is a refused login.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> ServiceResult<Result<User, LoginFailure>> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Ok(Err(LoginFailure::BlankCredentials));
    }

    let Some(user) = user_by_username(pool, username).await? else {
        tracing::info!("Invalid login details for {}", username);
        return Ok(Err(LoginFailure::InvalidCredentials));
    };

    // A malformed stored hash is treated like a wrong password.
    if !verify_password(password, &user.password).unwrap_or(false) {
        tracing::info!("Invalid login details for {}", username);
        return Ok(Err(LoginFailure::InvalidCredentials));
    }

    if !user.is_active {
        return Ok(Err(LoginFailure::Disabled));
    }

    Ok(Ok(user))
}

pub async fn user_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn user_by_username(pool: &SqlitePool, username: &str) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// The profile page: account, optional profile row and the top categories.
pub async fn profile(
    pool: &SqlitePool,
    user_id: i64,
    categories_limit: usize,
) -> ServiceResult<ProfileResponse> {
    let user = user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))?;

    let profile = sqlx::query_as::<_, UserProfile>(
        "SELECT id, user_id, website, picture FROM user_profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let categories = ranking::top_categories(pool, categories_limit).await?;

    Ok(ProfileResponse {
        user,
        profile,
        categories,
    })
}
