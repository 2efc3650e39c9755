use super::capability::{
    PromptMessage, RawSegment, RawTranscription, SpeechToText, TextGenerator,
};
use super::messages::{ChatCompletionRequest, ChatCompletionResponse, TranscriptionResponse};
use crate::config::AiConfig;
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// Client for an OpenAI-compatible API providing both speech-to-text and
/// chat completions
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    transcription_model: String,
    chat_model: String,
}

impl OpenAiClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        info!(
            "AI client initialized: {} (transcription={}, chat={})",
            config.base_url, config.transcription_model, config.chat_model
        );

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            transcription_model: config.transcription_model.clone(),
            chat_model: config.chat_model.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("AI service returned {}: {}", status, body)
    }
}

#[async_trait::async_trait]
impl SpeechToText for OpenAiClient {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<RawTranscription> {
        debug!("Transcribing {} ({} bytes)", filename, audio.len());

        let file = Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .context("Invalid audio media type")?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.transcription_model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment");

        let request = self
            .http_client
            .post(self.url("audio/transcriptions"))
            .multipart(form);
        let response = self
            .authorize(request)
            .send()
            .await
            .context("Transcription request failed")?;
        let response = Self::check_status(response).await?;

        let body: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        Ok(RawTranscription {
            text: body.text,
            duration: body.duration,
            segments: body.segments.map(|segments| {
                segments
                    .into_iter()
                    .map(|s| RawSegment {
                        start: s.start,
                        end: s.end,
                        text: s.text,
                    })
                    .collect()
            }),
        })
    }

    fn name(&self) -> &str {
        &self.transcription_model
    }
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, messages: Vec<PromptMessage>) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages,
            temperature: None,
        };

        let request = self
            .http_client
            .post(self.url("chat/completions"))
            .json(&body);
        let response = self
            .authorize(request)
            .send()
            .await
            .context("Chat completion request failed")?;
        let response = Self::check_status(response).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        completion
            .into_content()
            .context("Chat completion returned no content")
    }

    fn name(&self) -> &str {
        &self.chat_model
    }
}
