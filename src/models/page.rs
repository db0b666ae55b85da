use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'pages' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub id: i64,
    pub category_id: i64,
    pub title: String,

    /// External link; only presence and length are checked.
    pub url: String,

    /// Number of tracked redirects through `/goto`.
    pub views: i64,
}

/// Data required to get-or-create a [`Page`].
#[derive(Debug, Clone, Validate)]
pub struct NewPage {
    pub category_id: i64,

    #[validate(length(
        min = 1,
        max = 128,
        message = "Title length must be between 1 and 128 characters."
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "URL length must be between 1 and 200 characters."
    ))]
    #[validate(custom(function = "validate_redirect_target"))]
    pub url: String,

    #[validate(range(min = 0, message = "Views cannot be negative."))]
    pub views: i64,
}

impl NewPage {
    pub fn new(category_id: i64, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            category_id,
            title: title.into(),
            url: url.into(),
            views: 0,
        }
    }

    pub fn with_views(mut self, views: i64) -> Self {
        self.views = views;
        self
    }
}

/// Page URLs end up in a `Location` header, which cannot carry control characters.
fn validate_redirect_target(url: &str) -> Result<(), validator::ValidationError> {
    if url.chars().any(char::is_control) {
        let mut error = validator::ValidationError::new("control_character");
        error.message = Some("URL must not contain control characters.".into());
        return Err(error);
    }
    Ok(())
}

/// DTO for the "add page" form on a category.
#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub title: String,
    pub url: String,
}

/// DTO for adding a search result to a category in one click.
#[derive(Debug, Deserialize)]
pub struct AutoAddPageRequest {
    pub category_id: i64,
    pub title: String,
    pub url: String,
}

/// Query parameters of the tracked redirect.
///
/// `page_id` stays a string so that a malformed id falls back to the default
/// target instead of being rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct GotoParams {
    pub page_id: Option<String>,
}
