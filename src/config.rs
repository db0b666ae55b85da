// src/config.rs

use std::env;
use dotenvy::dotenv;

pub const DEFAULT_BING_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub bing_api_key: Option<String>,
    pub bing_endpoint: String,
    /// Redirect target when a tracked link points at an unknown page.
    pub fallback_redirect: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://rango.db".to_string());

        let jwt_secret = env::var("JWT_SECRET")?;

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let bing_api_key = env::var("BING_API_KEY").ok().filter(|k| !k.is_empty());

        let bing_endpoint = env::var("BING_SEARCH_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_BING_ENDPOINT.to_string());

        let fallback_redirect = env::var("FALLBACK_REDIRECT")
            .unwrap_or_else(|_| "/rango/".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            bing_api_key,
            bing_endpoint,
            fallback_redirect,
        })
    }
}
