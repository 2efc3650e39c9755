//! Recording processing pipeline
//!
//! A recording moves through these stages, persisted as two flags:
//! - Uploaded (processed=false, transcribed=false)
//! - Audio analyzed (processed=true, transcribed=false)
//! - Ready (processed=true, transcribed=true), summaries dispatched
//!
//! Failures also end in (true, true) so polling always terminates; the reason
//! is kept in `Recording::error`.

mod orchestrator;
mod status;

pub use orchestrator::{FanOutResults, Pipeline, PipelineRun, SummaryFanOut};
pub use status::{PipelineOutcome, PipelineStage, ProcessingStatus};
