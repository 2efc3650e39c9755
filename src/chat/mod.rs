//! Free-form questions against a transcript

mod assistant;

pub use assistant::ChatAssistant;
