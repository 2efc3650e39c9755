pub mod ai;
pub mod audio;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod store;
pub mod summary;
pub mod transcription;

pub use ai::{OpenAiClient, SpeechToText, TextGenerator};
pub use audio::{AudioFormat, AudioStorage, WavInfo};
pub use chat::ChatAssistant;
pub use config::Config;
pub use error::{AppError, Result};
pub use http::{create_router, AppState};
pub use pipeline::{Pipeline, PipelineOutcome, PipelineStage, ProcessingStatus};
pub use store::{MemoryStore, Recording, Store, Summary, SummaryKind, TranscriptSegment};
pub use summary::SummaryGenerator;
pub use transcription::TranscriptionAdapter;
