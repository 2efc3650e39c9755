use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker label attached to every transcript segment (no diarization)
pub const DEFAULT_SPEAKER: &str = "Speaker";

/// An uploaded conversation and its processing flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: u64,

    pub title: String,

    /// Name of the stored audio blob under the uploads directory
    pub filename: String,

    /// Duration in seconds (0 when unknown at upload time)
    pub duration: u64,

    /// Transcription call has returned
    pub processed: bool,

    /// Segments are persisted and summaries dispatched
    pub transcribed: bool,

    pub created_at: DateTime<Utc>,

    /// Failure reason when processing ended in the degenerate terminal state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRecording {
    pub title: String,
    pub filename: String,
    pub duration: u64,
}

/// Partial update merged into an existing recording
#[derive(Debug, Clone, Default)]
pub struct RecordingUpdate {
    pub title: Option<String>,
    pub duration: Option<u64>,
    pub processed: Option<bool>,
    pub transcribed: Option<bool>,
    pub error: Option<String>,
}

impl RecordingUpdate {
    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Merge the provided fields into `recording`.
    ///
    /// Setting `transcribed` also sets `processed`, so a recording can never
    /// be observed as transcribed but unprocessed.
    pub fn apply(self, recording: &mut Recording) {
        if let Some(title) = self.title {
            recording.title = title;
        }
        if let Some(duration) = self.duration {
            recording.duration = duration;
        }
        if let Some(processed) = self.processed {
            recording.processed = processed;
        }
        if let Some(transcribed) = self.transcribed {
            recording.transcribed = transcribed;
        }
        if recording.transcribed {
            recording.processed = true;
        }
        if let Some(error) = self.error {
            recording.error = Some(error);
        }
    }
}

/// One timestamped span of transcribed speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub id: u64,
    pub recording_id: u64,
    pub speaker: String,
    /// Offset from the start of the recording, in whole seconds
    pub timestamp: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSegment {
    pub recording_id: u64,
    pub speaker: String,
    pub timestamp: u64,
    pub text: String,
}

/// Summary template kind.
///
/// The five built-in kinds are generated for every recording; any other tag
/// requested by a client is kept as `Custom` and uses the generic template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SummaryKind {
    General,
    MentalModels,
    OneOnOne,
    Sales,
    Timeline,
    Custom(String),
}

impl SummaryKind {
    /// Kinds generated eagerly once a recording is transcribed
    pub const BUILT_IN: [SummaryKind; 5] = [
        SummaryKind::General,
        SummaryKind::MentalModels,
        SummaryKind::OneOnOne,
        SummaryKind::Sales,
        SummaryKind::Timeline,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SummaryKind::General => "general",
            SummaryKind::MentalModels => "mental-models",
            SummaryKind::OneOnOne => "1-on-1",
            SummaryKind::Sales => "sales",
            SummaryKind::Timeline => "timeline",
            SummaryKind::Custom(tag) => tag,
        }
    }
}

impl From<&str> for SummaryKind {
    fn from(tag: &str) -> Self {
        match tag {
            "general" => SummaryKind::General,
            "mental-models" => SummaryKind::MentalModels,
            "1-on-1" => SummaryKind::OneOnOne,
            "sales" => SummaryKind::Sales,
            "timeline" => SummaryKind::Timeline,
            other => SummaryKind::Custom(other.to_string()),
        }
    }
}

impl From<String> for SummaryKind {
    fn from(tag: String) -> Self {
        SummaryKind::from(tag.as_str())
    }
}

impl From<SummaryKind> for String {
    fn from(kind: SummaryKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: u64,
    pub recording_id: u64,
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewSummary {
    pub recording_id: u64,
    pub kind: SummaryKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub recording_id: u64,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub recording_id: u64,
    pub role: ChatRole,
    pub content: String,
}
