//! HTTP API server
//!
//! This module provides the REST API used by the web client:
//! - GET /api/health - Health check
//! - GET/POST /api/recordings - List recordings / create from the recorder
//! - POST /api/recordings/upload - Create from an uploaded file
//! - GET/DELETE /api/recordings/:id - Fetch / delete with cascade
//! - GET /api/recordings/:id/status - Processing progress
//! - GET /api/recordings/:id/audio - Stored audio
//! - GET /api/recordings/:id/transcript - Ordered transcript segments
//! - GET /api/recordings/:id/summary/:type - Summary, generated on first access
//! - GET/POST /api/recordings/:id/chat - Chat history / ask a question

mod extract;
mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
