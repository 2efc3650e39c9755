//! Templated summary generation

mod generator;
mod templates;

pub use generator::SummaryGenerator;
pub use templates::system_prompt;
