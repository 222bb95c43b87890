use crate::handlers::{capture_order, create_order, get_totals, health_check, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Assembles the HTTP surface. Static files are served from `static_dir`
/// when it exists, with unmatched paths answered by its `index.html`.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/api/create-order", post(create_order))
        .route("/api/capture-order", post(capture_order))
        .route("/api/total", get(get_totals))
        .with_state(state);

    match static_dir {
        Some(dir) if dir.is_dir() => {
            tracing::info!("Serving static files from {}", dir.display());
            let index = ServeFile::new(dir.join("index.html"));
            app = app.fallback_service(ServeDir::new(dir).fallback(index));
        }
        Some(dir) => {
            tracing::warn!("Static directory {} not found, static serving disabled", dir.display());
        }
        None => {}
    }

    app.layer(
        TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)),
    )
    .layer(CorsLayer::permissive())
}
