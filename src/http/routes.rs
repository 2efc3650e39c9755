use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Room for the non-audio multipart fields on top of the audio limit
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.audio.max_bytes().saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))
        // Recordings
        .route(
            "/api/recordings",
            get(handlers::list_recordings).post(handlers::create_recording),
        )
        .route("/api/recordings/upload", post(handlers::upload_recording))
        .route(
            "/api/recordings/:id",
            get(handlers::get_recording).delete(handlers::delete_recording),
        )
        .route(
            "/api/recordings/:id/status",
            get(handlers::get_recording_status),
        )
        .route(
            "/api/recordings/:id/audio",
            get(handlers::get_recording_audio),
        )
        // Derived content
        .route(
            "/api/recordings/:id/transcript",
            get(handlers::get_transcript),
        )
        .route(
            "/api/recordings/:id/summary/:type",
            get(handlers::get_summary),
        )
        .route(
            "/api/recordings/:id/chat",
            get(handlers::get_chat_history).post(handlers::post_chat_message),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
