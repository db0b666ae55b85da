// src/handlers/mod.rs

pub mod auth;
pub mod category;
pub mod index;
pub mod page;
pub mod profile;
pub mod search;

/// Length of the "top categories" and "top pages" lists.
pub const TOP_LIMIT: usize = 5;

/// Length of the category suggestion list.
pub const SUGGEST_LIMIT: usize = 8;
