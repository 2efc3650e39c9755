//! Entity storage
//!
//! Keyed collections for recordings and everything a recording owns:
//! - Transcript segments
//! - Summaries (one per recording and kind)
//! - Chat messages
//!
//! The `Store` trait is async so the in-memory implementation can be swapped
//! for networked storage without touching call sites.

mod memory;
mod models;

pub use memory::MemoryStore;
pub use models::{
    ChatMessage, ChatRole, NewChatMessage, NewRecording, NewSegment, NewSummary, Recording,
    RecordingUpdate, Summary, SummaryKind, TranscriptSegment, DEFAULT_SPEAKER,
};

use crate::error::Result;

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn get_recording(&self, id: u64) -> Option<Recording>;

    /// All recordings, newest first
    async fn list_recordings(&self) -> Vec<Recording>;

    async fn create_recording(&self, new: NewRecording) -> Recording;

    /// Merge `update` into an existing recording, failing with `NotFound`
    async fn update_recording(&self, id: u64, update: RecordingUpdate) -> Result<Recording>;

    /// Remove a recording and every segment, summary and chat message it owns.
    ///
    /// Returns `false` (and does nothing) when the id is unknown.
    async fn delete_recording(&self, id: u64) -> bool;

    /// Dependent inserts fail with `NotFound` when the owning recording is gone
    async fn create_segment(&self, new: NewSegment) -> Result<TranscriptSegment>;

    async fn create_segments(&self, new: Vec<NewSegment>) -> Result<Vec<TranscriptSegment>>;

    /// Segments of a recording ordered by ascending timestamp
    async fn list_segments(&self, recording_id: u64) -> Vec<TranscriptSegment>;

    /// First stored summary of `kind` for the recording
    async fn find_summary(&self, recording_id: u64, kind: &SummaryKind) -> Option<Summary>;

    async fn create_summary(&self, new: NewSummary) -> Result<Summary>;

    /// Replace the content of the existing (recording, kind) summary, or create it
    async fn upsert_summary(&self, new: NewSummary) -> Result<Summary>;

    async fn list_summaries(&self, recording_id: u64) -> Vec<Summary>;

    async fn create_chat_message(&self, new: NewChatMessage) -> Result<ChatMessage>;

    /// Chat messages of a recording, oldest first
    async fn list_chat_messages(&self, recording_id: u64) -> Vec<ChatMessage>;
}
