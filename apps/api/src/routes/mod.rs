pub mod health;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::report::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Static client bundle with single-page fallback: unknown paths get
    // index.html so the browser app can handle its own routing.
    let static_dir = Path::new(&state.config.static_dir);
    let assets =
        ServeDir::new(static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/report", post(handlers::handle_report))
        .fallback_service(assets)
        .with_state(state)
}
