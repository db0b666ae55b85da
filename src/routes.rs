// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, category, index, page, profile, search},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: index, about, category view, suggestions, tracked redirect, search.
/// * Protected routes (Bearer token): adding content, likes, profile.
/// * Global middleware: Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let public_routes = Router::new()
        .route("/index", get(index::index))
        .route("/about", get(index::about))
        .route("/categories/{slug}", get(category::show_category))
        .route("/suggest_category", get(category::suggest_category))
        .route("/goto", get(page::goto))
        .route("/search", post(search::run_search));

    let protected_routes = Router::new()
        .route("/categories", post(category::add_category))
        .route("/categories/{slug}/pages", post(page::add_page))
        .route("/like_category/{id}", post(category::like_category))
        .route("/auto_add_page", post(page::auto_add_page))
        .route("/profile", get(profile::get_profile))
        .route("/restricted", get(index::restricted))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = public_routes
        .merge(protected_routes)
        .nest("/auth", auth_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
