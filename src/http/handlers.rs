use super::extract::{AppJson, AppMultipart, AppPath};
use super::state::AppState;
use crate::audio::AudioFormat;
use crate::error::{AppError, Result};
use crate::pipeline::ProcessingStatus;
use crate::store::{ChatMessage, NewRecording, Recording, SummaryKind, TranscriptSegment};
use crate::transcription::transcript_text;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Audio part of a multipart upload
struct UploadedAudio {
    bytes: Vec<u8>,
    file_name: Option<String>,
    format: AudioFormat,
}

/// Parsed multipart form of both create endpoints
#[derive(Default)]
struct UploadForm {
    audio: Option<UploadedAudio>,
    title: Option<String>,
    duration: Option<String>,
}

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::validation(format!("Invalid multipart body: {}", e))
    }
}

async fn read_upload_form(mut multipart: Multipart, limit: usize) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let format = AudioFormat::detect(content_type.as_deref(), file_name.as_deref())
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "Unsupported audio type {}; expected wav, mp3, m4a, mpeg or webm",
                            content_type.as_deref().unwrap_or("(none)")
                        ))
                    })?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, limit))?;
                form.audio = Some(UploadedAudio {
                    bytes: bytes.to_vec(),
                    file_name,
                    format,
                });
            }
            "title" => {
                form.title = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            "duration" => {
                form.duration = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            other => {
                warn!("Ignoring unexpected multipart field: {}", other);
            }
        }
    }

    Ok(form)
}

fn default_title() -> String {
    format!("Recording {}", Utc::now().format("%Y-%m-%d %H:%M"))
}

fn parse_duration(raw: Option<&str>) -> Result<u64> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(0),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64)
            .ok_or_else(|| AppError::validation(format!("Invalid duration: {}", value))),
    }
}

/// Store the blob, create the row and start processing in the background
async fn create_and_dispatch(
    state: &AppState,
    audio: UploadedAudio,
    title: String,
    duration: u64,
) -> Result<Recording> {
    let filename = state
        .audio
        .save(&audio.bytes, audio.format, audio.file_name.as_deref())
        .await?;

    let recording = state
        .store
        .create_recording(NewRecording {
            title,
            filename,
            duration,
        })
        .await;

    info!(
        "Created recording {} ({}), dispatching pipeline",
        recording.id, recording.title
    );
    // Detached: progress is observed through the status endpoint
    drop(state.pipeline.spawn(recording.id));

    Ok(recording)
}

async fn require_recording(state: &AppState, id: u64) -> Result<Recording> {
    state
        .store
        .get_recording(id)
        .await
        .ok_or_else(|| AppError::not_found("Recording", id))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/recordings
/// All recordings, newest first
pub async fn list_recordings(State(state): State<AppState>) -> Json<Vec<Recording>> {
    Json(state.store.list_recordings().await)
}

/// GET /api/recordings/:id
pub async fn get_recording(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<Recording>> {
    Ok(Json(require_recording(&state, id).await?))
}

/// POST /api/recordings
/// Create a recording from the in-browser recorder (title and duration known)
pub async fn create_recording(
    State(state): State<AppState>,
    AppMultipart(multipart): AppMultipart,
) -> Result<(StatusCode, Json<Recording>)> {
    let form = read_upload_form(multipart, state.audio.max_bytes()).await?;
    let audio = form
        .audio
        .ok_or_else(|| AppError::validation("No audio file provided"))?;

    let title = form
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(default_title);
    let duration = parse_duration(form.duration.as_deref())?;

    let recording = create_and_dispatch(&state, audio, title, duration).await?;
    Ok((StatusCode::CREATED, Json(recording)))
}

/// POST /api/recordings/upload
/// Create a recording from an uploaded file (duration unknown until transcribed)
pub async fn upload_recording(
    State(state): State<AppState>,
    AppMultipart(multipart): AppMultipart,
) -> Result<(StatusCode, Json<Recording>)> {
    let form = read_upload_form(multipart, state.audio.max_bytes()).await?;
    let audio = form
        .audio
        .ok_or_else(|| AppError::validation("No audio file provided"))?;

    let title = audio
        .file_name
        .as_deref()
        .and_then(|name| std::path::Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(default_title);

    let recording = create_and_dispatch(&state, audio, title, 0).await?;
    Ok((StatusCode::CREATED, Json(recording)))
}

/// DELETE /api/recordings/:id
/// Delete a recording, everything it owns and its audio file
pub async fn delete_recording(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<MessageResponse>> {
    let recording = require_recording(&state, id).await?;

    if !state.store.delete_recording(id).await {
        return Err(AppError::not_found("Recording", id));
    }
    if let Err(e) = state.audio.delete(&recording.filename).await {
        warn!("Failed to remove audio for recording {}: {}", id, e);
    }

    info!("Deleted recording {}", id);
    Ok(Json(MessageResponse {
        message: format!("Recording {} deleted", id),
    }))
}

/// GET /api/recordings/:id/status
pub async fn get_recording_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<ProcessingStatus>> {
    let recording = require_recording(&state, id).await?;
    Ok(Json(ProcessingStatus::from(&recording)))
}

/// GET /api/recordings/:id/transcript
/// Segments ordered by timestamp (empty when none exist)
pub async fn get_transcript(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Json<Vec<TranscriptSegment>> {
    Json(state.store.list_segments(id).await)
}

/// GET /api/recordings/:id/summary/:type
/// Stored summary content, generated on first access
pub async fn get_summary(
    State(state): State<AppState>,
    AppPath((id, kind)): AppPath<(u64, String)>,
) -> Result<Json<String>> {
    require_recording(&state, id).await?;
    let kind = SummaryKind::from(kind);

    if let Some(summary) = state.store.find_summary(id, &kind).await {
        return Ok(Json(summary.content));
    }

    let segments = state.store.list_segments(id).await;
    if segments.is_empty() {
        return Err(AppError::not_found("Transcript for recording", id));
    }

    info!("No {} summary for recording {} yet, generating", kind, id);
    let summary = state
        .summaries
        .generate(id, kind, &transcript_text(&segments))
        .await?;
    Ok(Json(summary.content))
}

/// POST /api/recordings/:id/chat
/// Ask a question about the transcript
pub async fn post_chat_message(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::validation("Message is required"))?;

    let reply = state.chat.ask(id, &message).await?;
    Ok(Json(ChatResponse {
        response: reply.content,
    }))
}

/// GET /api/recordings/:id/chat
pub async fn get_chat_history(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Json<Vec<ChatMessage>> {
    Json(state.chat.history(id).await)
}

/// GET /api/recordings/:id/audio
/// Stored audio blob
pub async fn get_recording_audio(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<impl IntoResponse> {
    let recording = require_recording(&state, id).await?;
    let mime_type = AudioFormat::from_filename(&recording.filename)
        .map(|f| f.mime_type())
        .unwrap_or("application/octet-stream");

    let bytes = state.audio.read(&recording.filename).await.map_err(|e| match e {
        AppError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            AppError::not_found("Audio for recording", id)
        }
        other => other,
    })?;

    Ok(([(header::CONTENT_TYPE, mime_type)], bytes))
}
