//! Speech-to-text normalization and transcript rendering

mod adapter;
mod text;

pub use adapter::{NormalizedSegment, Transcript, TranscriptionAdapter};
pub use text::{format_timestamp, transcript_text};
