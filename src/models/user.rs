// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use validator::Validate;

use crate::models::category::CategoryListing;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub email: Option<String>,

    /// Disabled accounts cannot log in.
    pub is_active: bool,

    pub created_at: chrono::NaiveDateTime,
}

/// Represents the 'user_profiles' table. One row per user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub website: Option<String>,

    /// Reference to the profile image (URL or media path).
    pub picture: Option<String>,
}

/// DTO for creating a new user together with its profile (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username length must be between 3 and 30 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 200), custom(function = validate_url_string))]
    pub website: Option<String>,
    #[validate(length(max = 500))]
    pub picture: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response of the registration endpoint.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub user: User,
    pub profile: UserProfile,
}

/// Aggregated data for the profile page.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub profile: Option<UserProfile>,
    pub categories: Vec<CategoryListing>,
}

/// Validates that a string is a correctly formatted URL.
fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
