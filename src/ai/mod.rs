//! External AI capabilities
//!
//! The rest of the crate only sees two black boxes:
//! - `SpeechToText`: audio bytes → timestamped text
//! - `TextGenerator`: prompt messages → generated text
//!
//! `OpenAiClient` implements both against an OpenAI-compatible HTTP API.

pub mod capability;
pub mod client;
pub mod messages;

pub use capability::{
    PromptMessage, PromptRole, RawSegment, RawTranscription, SpeechToText, TextGenerator,
};
pub use client::OpenAiClient;
