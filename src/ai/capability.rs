use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A speech span as reported by the speech-to-text service
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds, if reported
    pub end: Option<f64>,
    pub text: String,
}

/// Speech-to-text output before normalization.
///
/// Services either segment the audio or return a single block of text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTranscription {
    pub text: String,
    pub segments: Option<Vec<RawSegment>>,
    /// Audio duration in seconds, if reported
    pub duration: Option<f64>,
}

/// External speech-to-text capability
///
/// Implementations:
/// - `OpenAiClient`: OpenAI-compatible `/v1/audio/transcriptions`
/// - Test doubles in the integration tests
#[async_trait::async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a complete audio file
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<RawTranscription>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// One message of a text-generation prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// External text-generation capability (chat completions)
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, messages: Vec<PromptMessage>) -> Result<String>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
