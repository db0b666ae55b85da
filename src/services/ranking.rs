//! Read-only listings ordered by popularity counters.
//!
//! Every `limit` argument treats `0` as "no limit". Ties are broken by
//! insertion order (`id ASC`).

use sqlx::SqlitePool;

use crate::{
    models::{
        category::{Category, CategoryListing, name_key},
        page::Page,
    },
    services::errors::{ServiceError, ServiceResult},
    slug,
};

const CATEGORY_COLUMNS: &str = "id, name, views, likes";
const PAGE_COLUMNS: &str = "id, category_id, title, url, views";

/// SQLite reads a negative LIMIT as unbounded.
fn sql_limit(limit: usize) -> i64 {
    if limit == 0 {
        -1
    } else {
        i64::try_from(limit).unwrap_or(i64::MAX)
    }
}

/// Escapes LIKE wildcards so the prefix is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Most liked categories first.
pub async fn top_categories(pool: &SqlitePool, limit: usize) -> ServiceResult<Vec<CategoryListing>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY likes DESC, id ASC LIMIT ?"
    ))
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(categories.into_iter().map(CategoryListing::from).collect())
}

/// Most viewed pages across all categories.
pub async fn top_pages(pool: &SqlitePool, limit: usize) -> ServiceResult<Vec<Page>> {
    let pages = sqlx::query_as::<_, Page>(&format!(
        "SELECT {PAGE_COLUMNS} FROM pages ORDER BY views DESC, id ASC LIMIT ?"
    ))
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(pages)
}

/// Pages of one category, most viewed first.
pub async fn top_pages_for_category(
    pool: &SqlitePool,
    category_id: i64,
    limit: usize,
) -> ServiceResult<Vec<Page>> {
    let pages = sqlx::query_as::<_, Page>(&format!(
        "SELECT {PAGE_COLUMNS} FROM pages WHERE category_id = ? ORDER BY views DESC, id ASC LIMIT ?"
    ))
    .bind(category_id)
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(pages)
}

/// Categories whose name starts with `prefix`, ignoring case.
/// An empty prefix matches every category.
pub async fn search_categories_by_prefix(
    pool: &SqlitePool,
    prefix: &str,
    limit: usize,
) -> ServiceResult<Vec<CategoryListing>> {
    let pattern = format!("{}%", escape_like(&name_key(prefix)));

    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE name_key LIKE ? ESCAPE '\\' ORDER BY id ASC LIMIT ?"
    ))
    .bind(pattern)
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    tracing::debug!("Categories starting with {:?}: {}", prefix, categories.len());

    Ok(categories.into_iter().map(CategoryListing::from).collect())
}

pub async fn category_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Exact name lookup, ignoring case.
pub async fn category_by_name(pool: &SqlitePool, name: &str) -> ServiceResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE name_key = ?"
    ))
    .bind(name_key(name))
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Resolves a URL slug to its category.
pub async fn category_by_slug(pool: &SqlitePool, category_slug: &str) -> ServiceResult<Category> {
    let name = slug::decode(category_slug);
    category_by_name(pool, &name)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Category '{name}'")))
}

pub async fn page_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<Page>> {
    let page = sqlx::query_as::<_, Page>(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_is_unbounded() {
        assert_eq!(sql_limit(0), -1);
        assert_eq!(sql_limit(8), 8);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("py"), "py");
        assert_eq!(escape_like("100%_\\"), "100\\%\\_\\\\");
    }
}
