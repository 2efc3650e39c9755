use super::models::{
    ChatMessage, NewChatMessage, NewRecording, NewSegment, NewSummary, Recording,
    RecordingUpdate, Summary, SummaryKind, TranscriptSegment,
};
use super::Store;
use crate::error::{AppError, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Collection with its own id counter; ids start at 1 and are never reused
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug)]
struct Tables {
    recordings: Table<Recording>,
    segments: Table<TranscriptSegment>,
    summaries: Table<Summary>,
    chat_messages: Table<ChatMessage>,
}

impl Tables {
    fn require_recording(&self, id: u64) -> Result<()> {
        if self.recordings.rows.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found("Recording", id))
        }
    }
}

/// In-process store backed by ordered maps.
///
/// A single lock covers all tables, so cascade deletes are atomic.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                recordings: Table::new(),
                segments: Table::new(),
                summaries: Table::new(),
                chat_messages: Table::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_segment(table: &mut Table<TranscriptSegment>, new: NewSegment) -> TranscriptSegment {
    let id = table.allocate_id();
    let segment = TranscriptSegment {
        id,
        recording_id: new.recording_id,
        speaker: new.speaker,
        timestamp: new.timestamp,
        text: new.text,
    };
    table.rows.insert(id, segment.clone());
    segment
}

fn insert_summary(table: &mut Table<Summary>, new: NewSummary) -> Summary {
    let id = table.allocate_id();
    let summary = Summary {
        id,
        recording_id: new.recording_id,
        kind: new.kind,
        content: new.content,
    };
    table.rows.insert(id, summary.clone());
    summary
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_recording(&self, id: u64) -> Option<Recording> {
        let tables = self.tables.read().await;
        tables.recordings.rows.get(&id).cloned()
    }

    async fn list_recordings(&self) -> Vec<Recording> {
        let tables = self.tables.read().await;
        let mut recordings: Vec<Recording> = tables.recordings.rows.values().cloned().collect();
        recordings.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        recordings
    }

    async fn create_recording(&self, new: NewRecording) -> Recording {
        let mut tables = self.tables.write().await;
        let id = tables.recordings.allocate_id();
        let recording = Recording {
            id,
            title: new.title,
            filename: new.filename,
            duration: new.duration,
            processed: false,
            transcribed: false,
            created_at: Utc::now(),
            error: None,
        };
        tables.recordings.rows.insert(id, recording.clone());
        debug!("Created recording {} ({})", id, recording.filename);
        recording
    }

    async fn update_recording(&self, id: u64, update: RecordingUpdate) -> Result<Recording> {
        let mut tables = self.tables.write().await;
        let recording = tables
            .recordings
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Recording", id))?;
        update.apply(recording);
        Ok(recording.clone())
    }

    async fn delete_recording(&self, id: u64) -> bool {
        let mut tables = self.tables.write().await;
        if tables.recordings.rows.remove(&id).is_none() {
            return false;
        }

        tables.segments.rows.retain(|_, s| s.recording_id != id);
        tables.summaries.rows.retain(|_, s| s.recording_id != id);
        tables.chat_messages.rows.retain(|_, m| m.recording_id != id);
        debug!("Deleted recording {} and its dependents", id);
        true
    }

    async fn create_segment(&self, new: NewSegment) -> Result<TranscriptSegment> {
        let mut tables = self.tables.write().await;
        tables.require_recording(new.recording_id)?;
        Ok(insert_segment(&mut tables.segments, new))
    }

    async fn create_segments(&self, new: Vec<NewSegment>) -> Result<Vec<TranscriptSegment>> {
        let mut tables = self.tables.write().await;
        for segment in &new {
            tables.require_recording(segment.recording_id)?;
        }
        Ok(new
            .into_iter()
            .map(|segment| insert_segment(&mut tables.segments, segment))
            .collect())
    }

    async fn list_segments(&self, recording_id: u64) -> Vec<TranscriptSegment> {
        let tables = self.tables.read().await;
        let mut segments: Vec<TranscriptSegment> = tables
            .segments
            .rows
            .values()
            .filter(|s| s.recording_id == recording_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps
        segments.sort_by_key(|s| s.timestamp);
        segments
    }

    async fn find_summary(&self, recording_id: u64, kind: &SummaryKind) -> Option<Summary> {
        let tables = self.tables.read().await;
        tables
            .summaries
            .rows
            .values()
            .find(|s| s.recording_id == recording_id && &s.kind == kind)
            .cloned()
    }

    async fn create_summary(&self, new: NewSummary) -> Result<Summary> {
        let mut tables = self.tables.write().await;
        tables.require_recording(new.recording_id)?;
        Ok(insert_summary(&mut tables.summaries, new))
    }

    async fn upsert_summary(&self, new: NewSummary) -> Result<Summary> {
        let mut tables = self.tables.write().await;
        tables.require_recording(new.recording_id)?;
        let existing = tables
            .summaries
            .rows
            .values_mut()
            .find(|s| s.recording_id == new.recording_id && s.kind == new.kind);

        let summary = match existing {
            Some(summary) => {
                summary.content = new.content;
                summary.clone()
            }
            None => insert_summary(&mut tables.summaries, new),
        };
        Ok(summary)
    }

    async fn list_summaries(&self, recording_id: u64) -> Vec<Summary> {
        let tables = self.tables.read().await;
        tables
            .summaries
            .rows
            .values()
            .filter(|s| s.recording_id == recording_id)
            .cloned()
            .collect()
    }

    async fn create_chat_message(&self, new: NewChatMessage) -> Result<ChatMessage> {
        let mut tables = self.tables.write().await;
        tables.require_recording(new.recording_id)?;
        let id = tables.chat_messages.allocate_id();
        let message = ChatMessage {
            id,
            recording_id: new.recording_id,
            role: new.role,
            content: new.content,
            created_at: Utc::now(),
        };
        tables.chat_messages.rows.insert(id, message.clone());
        Ok(message)
    }

    async fn list_chat_messages(&self, recording_id: u64) -> Vec<ChatMessage> {
        let tables = self.tables.read().await;
        let mut messages: Vec<ChatMessage> = tables
            .chat_messages
            .rows
            .values()
            .filter(|m| m.recording_id == recording_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        messages
    }
}
