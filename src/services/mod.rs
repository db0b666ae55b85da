// src/services/mod.rs

//! Operations the HTTP handlers and the seeder call into. Every function takes
//! the storage handle explicitly.

pub mod accounts;
pub mod errors;
pub mod interaction;
pub mod ranking;
pub mod retry;

pub use errors::{ServiceError, ServiceResult};
