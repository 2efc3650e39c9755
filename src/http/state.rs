use crate::ai::{SpeechToText, TextGenerator};
use crate::audio::AudioStorage;
use crate::chat::ChatAssistant;
use crate::pipeline::Pipeline;
use crate::store::Store;
use crate::summary::SummaryGenerator;
use crate::transcription::TranscriptionAdapter;
use std::sync::Arc;

/// Shared application state for HTTP handlers.
///
/// Built once before the server starts and lives for the whole process.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub audio: AudioStorage,
    pub pipeline: Pipeline,
    pub summaries: SummaryGenerator,
    pub chat: ChatAssistant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        audio: AudioStorage,
        speech_to_text: Arc<dyn SpeechToText>,
        text_generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let summaries = SummaryGenerator::new(Arc::clone(&store), Arc::clone(&text_generator));
        let pipeline = Pipeline::new(
            Arc::clone(&store),
            audio.clone(),
            TranscriptionAdapter::new(speech_to_text),
            summaries.clone(),
        );
        let chat = ChatAssistant::new(Arc::clone(&store), text_generator);

        Self {
            store,
            audio,
            pipeline,
            summaries,
            chat,
        }
    }
}
