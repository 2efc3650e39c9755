use crate::ai::{RawTranscription, SpeechToText};
use crate::audio::AudioFormat;
use crate::error::{AppError, Result};
use crate::store::DEFAULT_SPEAKER;
use std::sync::Arc;
use tracing::{info, warn};

/// A transcript segment in the shape the rest of the pipeline stores
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSegment {
    /// Whole seconds from the start of the recording
    pub timestamp: u64,
    pub speaker: String,
    pub text: String,
}

/// Normalized output of one transcription call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    pub segments: Vec<NormalizedSegment>,
    /// Estimated audio duration in whole seconds
    pub duration: Option<u64>,
}

/// Wraps the speech-to-text service and normalizes its output.
///
/// Failures are never retried here.
#[derive(Clone)]
pub struct TranscriptionAdapter {
    backend: Arc<dyn SpeechToText>,
}

impl TranscriptionAdapter {
    pub fn new(backend: Arc<dyn SpeechToText>) -> Self {
        Self { backend }
    }

    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        format: AudioFormat,
    ) -> Result<Transcript> {
        info!(
            "Transcribing {} with {} ({} bytes)",
            filename,
            self.backend.name(),
            audio.len()
        );

        let raw = self
            .backend
            .transcribe(audio, filename, format.mime_type())
            .await
            .map_err(|e| {
                warn!("Transcription of {} failed: {:#}", filename, e);
                AppError::TranscriptionFailed {
                    message: format!("{:#}", e),
                }
            })?;

        let transcript = Self::normalize(raw);
        info!(
            "Transcribed {}: {} segments, duration {:?}s",
            filename,
            transcript.segments.len(),
            transcript.duration
        );
        Ok(transcript)
    }

    /// Convert either service output shape into canonical segments.
    ///
    /// Segmented output keeps one segment per non-blank span with its start
    /// offset truncated to whole seconds. Whole-text output (or segmentation
    /// with nothing but blank spans) becomes a single segment at 0.
    pub fn normalize(raw: RawTranscription) -> Transcript {
        let mut segments: Vec<NormalizedSegment> = raw
            .segments
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(|s| NormalizedSegment {
                timestamp: s.start.max(0.0).trunc() as u64,
                speaker: DEFAULT_SPEAKER.to_string(),
                text: s.text.trim().to_string(),
            })
            .collect();

        if segments.is_empty() && !raw.text.trim().is_empty() {
            segments.push(NormalizedSegment {
                timestamp: 0,
                speaker: DEFAULT_SPEAKER.to_string(),
                text: raw.text.trim().to_string(),
            });
        }

        let last_segment_end = raw
            .segments
            .as_deref()
            .and_then(|s| s.last())
            .map(|s| s.end.unwrap_or(s.start));
        let duration = raw
            .duration
            .or(last_segment_end)
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.round() as u64);

        Transcript { segments, duration }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RawSegment;

    fn raw_segment(start: f64, end: f64, text: &str) -> RawSegment {
        RawSegment {
            start,
            end: Some(end),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_segmented_output_truncates_offsets() {
        let raw = RawTranscription {
            text: "ignored".to_string(),
            segments: Some(vec![
                raw_segment(0.0, 4.9, " Good morning."),
                raw_segment(4.9, 61.7, " Let's start."),
            ]),
            duration: Some(61.7),
        };

        let transcript = TranscriptionAdapter::normalize(raw);

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[1].timestamp, 4);
        assert_eq!(transcript.segments[1].text, "Let's start.");
        assert!(transcript.segments.iter().all(|s| s.speaker == "Speaker"));
        assert_eq!(transcript.duration, Some(62));
    }

    #[test]
    fn test_whole_text_fallback_yields_single_segment() {
        let raw = RawTranscription {
            text: "One block of text".to_string(),
            segments: None,
            duration: None,
        };

        let transcript = TranscriptionAdapter::normalize(raw);

        assert_eq!(
            transcript.segments,
            vec![NormalizedSegment {
                timestamp: 0,
                speaker: "Speaker".to_string(),
                text: "One block of text".to_string(),
            }]
        );
        assert_eq!(transcript.duration, None);
    }

    #[test]
    fn test_blank_segments_fall_back_to_text() {
        let raw = RawTranscription {
            text: "Only this".to_string(),
            segments: Some(vec![raw_segment(0.0, 1.0, "   ")]),
            duration: None,
        };

        let transcript = TranscriptionAdapter::normalize(raw);

        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.segments[0].text, "Only this");
        assert_eq!(transcript.duration, Some(1));
    }

    #[test]
    fn test_silence_yields_no_segments() {
        let transcript = TranscriptionAdapter::normalize(RawTranscription::default());
        assert!(transcript.segments.is_empty());
        assert_eq!(transcript.duration, None);
    }
}
