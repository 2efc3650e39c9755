use super::templates::system_prompt;
use crate::ai::{PromptMessage, TextGenerator};
use crate::error::{AppError, Result};
use crate::store::{NewSummary, Store, Summary, SummaryKind};
use std::sync::Arc;
use tracing::{info, warn};

/// Generates templated summaries and stores them, one per (recording, kind)
#[derive(Clone)]
pub struct SummaryGenerator {
    store: Arc<dyn Store>,
    generator: Arc<dyn TextGenerator>,
}

impl SummaryGenerator {
    pub fn new(store: Arc<dyn Store>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { store, generator }
    }

    /// Generate a summary of `kind` from `transcript` and store it.
    ///
    /// An existing summary of the same kind is overwritten rather than
    /// duplicated.
    pub async fn generate(
        &self,
        recording_id: u64,
        kind: SummaryKind,
        transcript: &str,
    ) -> Result<Summary> {
        info!("Generating {} summary for recording {}", kind, recording_id);

        let messages = vec![
            PromptMessage::system(system_prompt(&kind)),
            PromptMessage::user(transcript),
        ];

        let content = self.generator.generate(messages).await.map_err(|e| {
            warn!(
                "{} summary for recording {} failed: {:#}",
                kind, recording_id, e
            );
            AppError::SummaryGenerationFailed {
                kind: kind.to_string(),
                message: format!("{:#}", e),
            }
        })?;

        let summary = self
            .store
            .upsert_summary(NewSummary {
                recording_id,
                kind,
                content,
            })
            .await?;

        info!(
            "Stored {} summary {} for recording {}",
            summary.kind, summary.id, recording_id
        );
        Ok(summary)
    }
}
