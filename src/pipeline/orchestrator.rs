use super::status::{PipelineOutcome, PipelineStage};
use crate::audio::{AudioFormat, AudioStorage, WavInfo};
use crate::error::{AppError, Result};
use crate::store::{NewSegment, Store, Summary, SummaryKind};
use crate::summary::SummaryGenerator;
use crate::transcription::{transcript_text, TranscriptionAdapter};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Per-kind results of one summary fan-out
pub type FanOutResults = Vec<(SummaryKind, Result<Summary>)>;

/// Handle on the summary generations dispatched by a pipeline run.
///
/// Dropping it leaves the generations running; awaiting it yields each
/// kind's result once all of them have finished.
pub struct SummaryFanOut {
    watcher: JoinHandle<FanOutResults>,
}

impl SummaryFanOut {
    pub async fn wait(self) -> FanOutResults {
        match self.watcher.await {
            Ok(results) => results,
            Err(e) => {
                error!("Summary fan-out watcher panicked: {}", e);
                Vec::new()
            }
        }
    }
}

/// Outcome of a pipeline run plus the summaries it dispatched
pub struct PipelineRun {
    pub outcome: PipelineOutcome,
    pub summaries: Option<SummaryFanOut>,
}

/// Drives a recording from upload to ready:
/// audio → transcription → segments → summary fan-out
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn Store>,
    audio: AudioStorage,
    transcriber: TranscriptionAdapter,
    summaries: SummaryGenerator,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn Store>,
        audio: AudioStorage,
        transcriber: TranscriptionAdapter,
        summaries: SummaryGenerator,
    ) -> Self {
        Self {
            store,
            audio,
            transcriber,
            summaries,
        }
    }

    /// Process a recording on a background task.
    ///
    /// The returned handle may be dropped; the outcome is logged either way.
    pub fn spawn(&self, recording_id: u64) -> JoinHandle<PipelineOutcome> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.run(recording_id).await.outcome })
    }

    /// Process a recording to a terminal state.
    ///
    /// Never fails: any error before the summary fan-out forces both
    /// processing flags on and records the reason on the recording, so
    /// polling clients always reach completion.
    pub async fn run(&self, recording_id: u64) -> PipelineRun {
        info!("Pipeline started for recording {}", recording_id);

        match self.process(recording_id).await {
            Ok((segments, summaries)) => {
                info!(
                    "Pipeline finished for recording {} ({} segments)",
                    recording_id, segments
                );
                PipelineRun {
                    outcome: PipelineOutcome::Ready { segments },
                    summaries,
                }
            }
            Err(e) => {
                error!("Pipeline failed for recording {}: {}", recording_id, e);
                let outcome = PipelineOutcome::Failed {
                    reason: e.to_string(),
                };
                self.mark_failed(recording_id, outcome.stage()).await;
                PipelineRun {
                    outcome,
                    summaries: None,
                }
            }
        }
    }

    async fn process(&self, recording_id: u64) -> Result<(usize, Option<SummaryFanOut>)> {
        let recording = self
            .store
            .get_recording(recording_id)
            .await
            .ok_or_else(|| AppError::not_found("Recording", recording_id))?;

        // 1. Locate the stored audio
        let format = AudioFormat::from_filename(&recording.filename).ok_or_else(|| {
            AppError::validation(format!("Unsupported audio file {}", recording.filename))
        })?;
        let audio = self.audio.read(&recording.filename).await?;

        let probed_duration = if recording.duration == 0 && format == AudioFormat::Wav {
            WavInfo::from_bytes(&audio).ok().map(|info| info.whole_seconds())
        } else {
            None
        };

        // 2. Transcribe
        self.enter(recording_id, &PipelineStage::Transcribing, None)
            .await?;
        let transcript = self
            .transcriber
            .transcribe(audio, &recording.filename, format)
            .await?;

        // 3. Correct an unknown duration and mark the audio as analyzed
        let corrected_duration = if recording.duration == 0 {
            transcript.duration.or(probed_duration)
        } else {
            None
        };
        self.enter(recording_id, &PipelineStage::AudioAnalyzed, corrected_duration)
            .await?;

        // 4. Persist segments
        let new_segments = transcript
            .segments
            .into_iter()
            .map(|s| NewSegment {
                recording_id,
                speaker: s.speaker,
                timestamp: s.timestamp,
                text: s.text,
            })
            .collect();
        let segments = self.store.create_segments(new_segments).await?;

        // 5. Ready for readers
        self.enter(recording_id, &PipelineStage::Ready, None).await?;

        // 6. Fan out summaries without waiting for them
        if segments.is_empty() {
            warn!(
                "Recording {} produced no transcript; skipping summaries",
                recording_id
            );
            return Ok((0, None));
        }

        let text = transcript_text(&self.store.list_segments(recording_id).await);
        let fan_out = self.dispatch_summaries(recording_id, text);

        Ok((segments.len(), Some(fan_out)))
    }

    /// Start one generation task per built-in summary kind.
    ///
    /// Tasks are independent: a failure is logged and never cancels the
    /// others.
    fn dispatch_summaries(&self, recording_id: u64, transcript: String) -> SummaryFanOut {
        let transcript: Arc<str> = Arc::from(transcript);

        let tasks: Vec<(SummaryKind, JoinHandle<Result<Summary>>)> = SummaryKind::BUILT_IN
            .iter()
            .cloned()
            .map(|kind| {
                let generator = self.summaries.clone();
                let transcript = Arc::clone(&transcript);
                let task_kind = kind.clone();
                let handle = tokio::spawn(async move {
                    generator
                        .generate(recording_id, task_kind, &transcript)
                        .await
                });
                (kind, handle)
            })
            .collect();

        info!(
            "Dispatched {} summary generations for recording {}",
            tasks.len(),
            recording_id
        );

        let watcher = tokio::spawn(async move {
            let (kinds, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
            let joined = futures::future::join_all(handles).await;

            kinds
                .into_iter()
                .zip(joined)
                .map(|(kind, joined)| {
                    let result = joined.unwrap_or_else(|e| {
                        Err(AppError::Internal(format!("Summary task panicked: {}", e)))
                    });
                    if let Err(e) = &result {
                        warn!(
                            "{} summary for recording {} not stored: {}",
                            kind, recording_id, e
                        );
                    }
                    (kind, result)
                })
                .collect()
        });

        SummaryFanOut { watcher }
    }

    /// Move a recording into `stage`, persisting its flags unless transient
    async fn enter(
        &self,
        recording_id: u64,
        stage: &PipelineStage,
        duration: Option<u64>,
    ) -> Result<()> {
        debug!("Recording {} entering {:?}", recording_id, stage);
        let Some(mut update) = stage.update() else {
            return Ok(());
        };
        if let Some(duration) = duration {
            update = update.with_duration(duration);
        }
        self.store.update_recording(recording_id, update).await?;
        Ok(())
    }

    async fn mark_failed(&self, recording_id: u64, stage: PipelineStage) {
        if let Err(e) = self.enter(recording_id, &stage, None).await {
            warn!(
                "Could not mark recording {} as failed: {}",
                recording_id, e
            );
        }
    }
}
