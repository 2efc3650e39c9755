use crate::store::TranscriptSegment;

/// Format an offset in seconds as `m:ss`
pub fn format_timestamp(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Render segments as prompt text: `Speaker (m:ss): text`, one blank line
/// between segments
pub fn transcript_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("{} ({}): {}", s.speaker, format_timestamp(s.timestamp), s.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
