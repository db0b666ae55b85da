//! Counter updates and idempotent content creation.
//!
//! Counters are bumped with a single `UPDATE .. SET x = x + 1 .. RETURNING`
//! so concurrent requests never overwrite each other's increment.

use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    models::{
        category::{Category, NewCategory, name_key},
        page::{NewPage, Page},
    },
    services::{
        errors::{ServiceError, ServiceResult},
        ranking,
        retry::RetryPolicy,
    },
};

/// Adds one like to a category and returns the new total.
pub async fn like_category(pool: &SqlitePool, category_id: i64) -> ServiceResult<i64> {
    let likes = RetryPolicy::default()
        .run(|| {
            sqlx::query_scalar::<_, i64>(
                "UPDATE categories SET likes = likes + 1 WHERE id = ? RETURNING likes",
            )
            .bind(category_id)
            .fetch_optional(pool)
        })
        .await?;

    match likes {
        Some(likes) => {
            tracing::info!("Category {}, likes {}", category_id, likes);
            Ok(likes)
        }
        None => {
            tracing::warn!("Category ID {} does not exist", category_id);
            Err(ServiceError::not_found(format!("Category {category_id}")))
        }
    }
}

/// Where a tracked link sends the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Visit {
    /// The page exists and its counter was incremented.
    Tracked { page_id: i64, views: i64, url: String },
    /// Nothing was counted; the visitor goes to the default target.
    Fallback { url: String },
}

impl Visit {
    pub fn target(&self) -> &str {
        match self {
            Visit::Tracked { url, .. } | Visit::Fallback { url } => url,
        }
    }
}

/// Counts a visit to a page and returns the redirect target.
///
/// Never fails: unknown pages and storage errors fall back to `fallback`.
pub async fn track_page_visit(pool: &SqlitePool, page_id: i64, fallback: &str) -> Visit {
    let result = RetryPolicy::default()
        .run(|| {
            sqlx::query_as::<_, (i64, String)>(
                "UPDATE pages SET views = views + 1 WHERE id = ? RETURNING views, url",
            )
            .bind(page_id)
            .fetch_optional(pool)
        })
        .await;

    match result {
        Ok(Some((views, url))) => {
            tracing::info!("Page {}, views {}, redirecting to {}", page_id, views, url);
            Visit::Tracked { page_id, views, url }
        }
        Ok(None) => {
            tracing::warn!("Invalid page id: {}", page_id);
            Visit::Fallback {
                url: fallback.to_string(),
            }
        }
        Err(e) => {
            tracing::error!("Failed to track visit of page {}: {}", page_id, e);
            Visit::Fallback {
                url: fallback.to_string(),
            }
        }
    }
}

/// Get-or-create keyed by name (case-insensitive).
///
/// Returns the stored category and whether this call created it. When the
/// name already exists the stored counters are left untouched.
pub async fn add_category(
    pool: &SqlitePool,
    category: &NewCategory,
) -> ServiceResult<(Category, bool)> {
    category.validate()?;
    let name = category.name.trim();
    if name.is_empty() {
        return Err(blank_field("name"));
    }

    let inserted = RetryPolicy::default()
        .run(|| {
            sqlx::query(
                "INSERT INTO categories (name, name_key, views, likes) VALUES (?, ?, ?, ?) ON CONFLICT(name_key) DO NOTHING",
            )
            .bind(name)
            .bind(name_key(name))
            .bind(category.views)
            .bind(category.likes)
            .execute(pool)
        })
        .await?
        .rows_affected()
        > 0;

    let stored = ranking::category_by_name(pool, name)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Category '{name}'")))?;

    if inserted {
        tracing::info!("Created category {} ({})", stored.name, stored.id);
    }

    Ok((stored, inserted))
}

/// Get-or-create keyed by (category, title, url).
pub async fn add_page(pool: &SqlitePool, page: &NewPage) -> ServiceResult<(Page, bool)> {
    page.validate()?;
    let title = page.title.trim();
    let url = page.url.trim();
    if title.is_empty() {
        return Err(blank_field("title"));
    }
    if url.is_empty() {
        return Err(blank_field("url"));
    }

    if ranking::category_by_id(pool, page.category_id).await?.is_none() {
        return Err(ServiceError::not_found(format!("Category {}", page.category_id)));
    }

    let inserted = RetryPolicy::default()
        .run(|| {
            sqlx::query(
                r#"
                INSERT INTO pages (category_id, title, url, views)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(category_id, title, url) DO NOTHING
                "#,
            )
            .bind(page.category_id)
            .bind(title)
            .bind(url)
            .bind(page.views)
            .execute(pool)
        })
        .await?
        .rows_affected()
        > 0;

    let stored = sqlx::query_as::<_, Page>(
        r#"
        SELECT id, category_id, title, url, views
        FROM pages
        WHERE category_id = ? AND title = ? AND url = ?
        "#,
    )
    .bind(page.category_id)
    .bind(title)
    .bind(url)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found(format!("Page '{title}'")))?;

    if inserted {
        tracing::info!("New page was added: {} ({})", stored.title, stored.id);
    }

    Ok((stored, inserted))
}

/// The "add page" form: resolves the category from its slug, starts at zero views.
pub async fn add_page_to_category(
    pool: &SqlitePool,
    category_slug: &str,
    title: &str,
    url: &str,
) -> ServiceResult<(Page, bool)> {
    let category = ranking::category_by_slug(pool, category_slug).await?;
    add_page(pool, &NewPage::new(category.id, title, url)).await
}

/// Files a search result under a category and returns the category's pages,
/// most viewed first.
pub async fn auto_add_page(
    pool: &SqlitePool,
    category_id: i64,
    title: &str,
    url: &str,
) -> ServiceResult<Vec<Page>> {
    add_page(pool, &NewPage::new(category_id, title, url)).await?;
    ranking::top_pages_for_category(pool, category_id, 0).await
}

fn blank_field(field: &'static str) -> ServiceError {
    let mut errors = validator::ValidationErrors::new();
    let mut error = validator::ValidationError::new("blank");
    error.message = Some("This field is required.".into());
    errors.add(field, error);
    ServiceError::Validation(errors)
}
