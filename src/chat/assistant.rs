use crate::ai::{PromptMessage, TextGenerator};
use crate::error::{AppError, Result};
use crate::store::{ChatMessage, ChatRole, NewChatMessage, Store};
use crate::transcription::transcript_text;
use std::sync::Arc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You answer questions about a recorded conversation. \
Base every answer on the transcript below; each line starts with a speaker label and an \
(m:ss) offset. Cite offsets when they help. If the transcript does not contain the answer, \
say so instead of guessing.";

/// Question answering against a recording's transcript
#[derive(Clone)]
pub struct ChatAssistant {
    store: Arc<dyn Store>,
    generator: Arc<dyn TextGenerator>,
}

impl ChatAssistant {
    pub fn new(store: Arc<dyn Store>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { store, generator }
    }

    /// Answer `message` and record both sides of the exchange.
    ///
    /// Nothing is stored unless the recording exists and has a transcript.
    /// If generation fails the user message stays stored without a reply.
    pub async fn ask(&self, recording_id: u64, message: &str) -> Result<ChatMessage> {
        let question = message.trim();
        if question.is_empty() {
            return Err(AppError::validation("Message is required"));
        }

        if self.store.get_recording(recording_id).await.is_none() {
            return Err(AppError::not_found("Recording", recording_id));
        }

        let segments = self.store.list_segments(recording_id).await;
        if segments.is_empty() {
            return Err(AppError::not_found("Transcript for recording", recording_id));
        }

        let history = self.store.list_chat_messages(recording_id).await;

        self.store
            .create_chat_message(NewChatMessage {
                recording_id,
                role: ChatRole::User,
                content: question.to_string(),
            })
            .await?;

        let mut prompt = Vec::with_capacity(history.len() + 2);
        prompt.push(PromptMessage::system(format!(
            "{}\n\nTranscript:\n{}",
            SYSTEM_PROMPT,
            transcript_text(&segments)
        )));
        prompt.extend(history.into_iter().map(|m| match m.role {
            ChatRole::User => PromptMessage::user(m.content),
            ChatRole::Assistant => PromptMessage::assistant(m.content),
        }));
        prompt.push(PromptMessage::user(question));

        info!(
            "Answering chat message for recording {} ({} prompt messages)",
            recording_id,
            prompt.len()
        );

        let answer = self.generator.generate(prompt).await.map_err(|e| {
            warn!("Chat generation for recording {} failed: {:#}", recording_id, e);
            AppError::upstream(format!("{:#}", e))
        })?;

        self.store
            .create_chat_message(NewChatMessage {
                recording_id,
                role: ChatRole::Assistant,
                content: answer,
            })
            .await
    }

    pub async fn history(&self, recording_id: u64) -> Vec<ChatMessage> {
        self.store.list_chat_messages(recording_id).await
    }
}
