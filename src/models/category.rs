use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::slug;

/// Represents the 'categories' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,

    /// Display name, unique ignoring case.
    pub name: String,

    /// Seeded counter. Not derived from the views of the category's pages.
    pub views: i64,

    pub likes: i64,
}

impl Category {
    pub fn slug(&self) -> String {
        slug::encode(&self.name)
    }
}

/// Case-folded form of a category name, used for uniqueness and lookups.
///
/// Folding happens here rather than in SQLite, whose `NOCASE` and `LIKE`
/// only fold ASCII letters.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// A category annotated with its URL slug for a single response.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    #[serde(flatten)]
    pub category: Category,
    pub slug: String,
}

impl From<Category> for CategoryListing {
    fn from(category: Category) -> Self {
        let slug = category.slug();
        Self { category, slug }
    }
}

/// Data required to get-or-create a [`Category`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Name length must be between 1 and 128 characters."
    ))]
    pub name: String,

    #[validate(range(min = 0, message = "Views cannot be negative."))]
    #[serde(default)]
    pub views: i64,

    #[validate(range(min = 0, message = "Likes cannot be negative."))]
    #[serde(default)]
    pub likes: i64,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, views: i64, likes: i64) -> Self {
        Self {
            name: name.into(),
            views,
            likes,
        }
    }
}

/// DTO for the "add category" form. Counters always start at zero.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Query parameters for the category suggestion box.
#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_folds_non_ascii_letters() {
        assert_eq!(name_key("Ärger"), name_key("ärger"));
        assert_eq!(name_key("Other Frameworks"), "other frameworks");
        assert_ne!(name_key("Python"), name_key("PyTorch"));
    }
}
