pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::interview::handlers;
use crate::state::AppState;

/// All routes, with request tracing and permissive CORS (any origin, method
/// and header) applied to every one of them.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/upload_resume", post(handlers::handle_upload_resume))
        .route(
            "/generate_questions",
            post(handlers::handle_generate_questions),
        )
        .route("/answer", post(handlers::handle_answer))
        .route("/final_report", post(handlers::handle_final_report))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
