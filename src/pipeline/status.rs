use crate::store::{Recording, RecordingUpdate};
use serde::{Deserialize, Serialize};

/// Coarse progress reported to polling clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    /// Percentage: 25, 75 or 100
    pub progress: u8,
    /// Human-readable stage label
    pub status: String,
}

impl ProcessingStatus {
    /// Project the two processing flags onto a progress value.
    ///
    /// `transcribed` dominates, so the unreachable (false, true) combination
    /// still reads as completed.
    pub fn from_flags(processed: bool, transcribed: bool) -> Self {
        let (progress, status) = match (processed, transcribed) {
            (_, true) => (100, "Completed"),
            (true, false) => (75, "Generating insights"),
            (false, false) => (25, "Transcribing audio"),
        };
        Self {
            progress,
            status: status.to_string(),
        }
    }
}

impl From<&Recording> for ProcessingStatus {
    fn from(recording: &Recording) -> Self {
        Self::from_flags(recording.processed, recording.transcribed)
    }
}

/// Where a recording is in its processing lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStage {
    /// Stored, waiting for transcription
    Uploaded,
    /// Transcription call in flight; not persisted
    Transcribing,
    /// Transcription returned, segments not yet stored
    AudioAnalyzed,
    /// Segments stored and summaries dispatched
    Ready,
    /// Processing ended early; flags are forced to terminal values
    Failed(String),
}

impl PipelineStage {
    /// Derive the persisted stage of a recording
    pub fn of(recording: &Recording) -> Self {
        match (recording.processed, recording.transcribed, &recording.error) {
            (_, true, Some(reason)) => Self::Failed(reason.clone()),
            (_, true, None) => Self::Ready,
            (true, false, _) => Self::AudioAnalyzed,
            (false, false, _) => Self::Uploaded,
        }
    }

    /// Wire representation as `(processed, transcribed)`
    pub fn flags(&self) -> (bool, bool) {
        match self {
            Self::Uploaded | Self::Transcribing => (false, false),
            Self::AudioAnalyzed => (true, false),
            Self::Ready | Self::Failed(_) => (true, true),
        }
    }

    /// Store update that moves a recording into this stage.
    ///
    /// `None` for transient stages, which leave the stored flags alone.
    pub fn update(&self) -> Option<RecordingUpdate> {
        if *self == Self::Transcribing {
            return None;
        }
        let (processed, transcribed) = self.flags();
        let update = RecordingUpdate {
            processed: Some(processed),
            transcribed: Some(transcribed),
            ..Default::default()
        };
        Some(match self {
            Self::Failed(reason) => update.with_error(reason.clone()),
            _ => update,
        })
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Ready { segments: usize },
    Failed { reason: String },
}

impl PipelineOutcome {
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Ready { .. } => PipelineStage::Ready,
            Self::Failed { reason } => PipelineStage::Failed(reason.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn recording(processed: bool, transcribed: bool, error: Option<&str>) -> Recording {
        Recording {
            id: 1,
            title: "Sync".to_string(),
            filename: "1-a.wav".to_string(),
            duration: 10,
            processed,
            transcribed,
            created_at: Utc::now(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_status_projection_table() {
        let cases = [
            ((false, false), 25, "Transcribing audio"),
            ((true, false), 75, "Generating insights"),
            ((true, true), 100, "Completed"),
        ];

        for ((processed, transcribed), progress, label) in cases {
            let status = ProcessingStatus::from_flags(processed, transcribed);
            assert_eq!(status.progress, progress);
            assert_eq!(status.status, label);
        }
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(ProcessingStatus::from_flags(true, false)).unwrap();
        assert_eq!(json, serde_json::json!({"progress": 75, "status": "Generating insights"}));
    }

    #[test]
    fn test_failed_recording_reads_as_completed() {
        let rec = recording(true, true, Some("Transcription failed: quota"));

        assert_eq!(ProcessingStatus::from(&rec).progress, 100);
        assert_eq!(
            PipelineStage::of(&rec),
            PipelineStage::Failed("Transcription failed: quota".to_string())
        );
    }

    #[test]
    fn test_stage_flags_round_trip() {
        for rec in [
            recording(false, false, None),
            recording(true, false, None),
            recording(true, true, None),
            recording(true, true, Some("boom")),
        ] {
            let stage = PipelineStage::of(&rec);
            assert_eq!(stage.flags(), (rec.processed, rec.transcribed));
        }
    }

    #[test]
    fn test_stage_update_applies_its_flags() {
        let mut rec = recording(false, false, None);

        assert!(PipelineStage::Transcribing.update().is_none());
        assert_eq!(PipelineStage::Transcribing.flags(), (false, false));

        PipelineStage::AudioAnalyzed.update().unwrap().apply(&mut rec);
        assert_eq!(PipelineStage::of(&rec), PipelineStage::AudioAnalyzed);

        PipelineStage::Ready.update().unwrap().apply(&mut rec);
        assert_eq!(PipelineStage::of(&rec), PipelineStage::Ready);
        assert!(rec.error.is_none());
    }

    #[test]
    fn test_failed_stage_update_records_reason() {
        let mut rec = recording(false, false, None);
        PipelineStage::Failed("no audio".to_string())
            .update()
            .unwrap()
            .apply(&mut rec);

        assert!(rec.processed && rec.transcribed);
        assert_eq!(rec.error.as_deref(), Some("no audio"));
    }

    #[test]
    fn test_outcome_stage() {
        assert_eq!(
            PipelineOutcome::Ready { segments: 3 }.stage(),
            PipelineStage::Ready
        );
        assert_eq!(
            PipelineOutcome::Failed {
                reason: "x".to_string()
            }
            .stage(),
            PipelineStage::Failed("x".to_string())
        );
    }
}
