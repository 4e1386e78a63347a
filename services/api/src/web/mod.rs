pub mod bookmarks;
pub mod rest;
pub mod state;

pub use rest::{
    generate_test_handler, get_test_handler, list_my_tests_handler, list_tests_handler,
    remove_my_test_handler, score_test_handler,
};

use axum::{
    routing::{delete, get, post},
    Router,
};
use state::AppState;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Builds the JSON API router. When `public_dir` is given, unmatched paths are
/// served as static files from it (the browser front end).
pub fn build_router(app_state: Arc<AppState>, public_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/generate-test", post(generate_test_handler))
        .route("/tests", get(list_tests_handler))
        .route("/tests/mine", get(list_my_tests_handler))
        .route("/tests/mine/{id}", delete(remove_my_test_handler))
        .route("/test/{id}", get(get_test_handler))
        .route("/test/{id}/score", post(score_test_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    match public_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}
