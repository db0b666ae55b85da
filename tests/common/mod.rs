#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use rango::{
    config::Config,
    db, routes,
    search::{SearchError, SearchProvider, SearchResult},
    state::AppState,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const FALLBACK: &str = "/rango/";

/// A migrated database in a temporary directory. The directory is removed
/// when the value is dropped, so keep it alive for the whole test.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("rango.db").display());

    let pool = db::connect(&url, 5).await.expect("Failed to open SQLite");
    db::migrate(&pool).await.expect("Failed to migrate database");

    TestDb { pool, _dir: dir }
}

/// Search provider answering every query with the same results.
pub struct StubSearch(pub Vec<SearchResult>);

#[async_trait]
impl SearchProvider for StubSearch {
    async fn run_query(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.0.clone())
    }
}

pub fn stub_results() -> Vec<SearchResult> {
    vec![SearchResult {
        title: "The Rust Book".to_string(),
        link: "https://doc.rust-lang.org/book/".to_string(),
        excerpt: "An introductory book about Rust.".to_string(),
    }]
}

pub struct TestApp {
    pub address: String,
    pub db: TestDb,
}

/// Spawns the app on a random port and returns its base URL with the database.
pub async fn spawn_app() -> TestApp {
    let db = test_db().await;

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        bing_api_key: None,
        bing_endpoint: rango::config::DEFAULT_BING_ENDPOINT.to_string(),
        fallback_redirect: FALLBACK.to_string(),
    };

    let state = AppState {
        pool: db.pool.clone(),
        config,
        search: Arc::new(StubSearch(stub_results())),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, db }
}

/// Registers a fresh user and returns a bearer token.
pub async fn login_new_user(client: &reqwest::Client, address: &str) -> String {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let login = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}
