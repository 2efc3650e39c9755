// Shared test doubles for the external AI services and WAV fixtures
#![allow(dead_code)]

use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use recap::ai::{PromptMessage, PromptRole, RawTranscription, SpeechToText, TextGenerator};
use recap::{AppState, AudioStorage, MemoryStore, Store};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Build a silent 16-bit mono WAV file in memory
pub fn wav_bytes(seconds: u32) -> Vec<u8> {
    let sample_rate = 16000;
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).expect("wav writer");
        for _ in 0..(seconds * sample_rate) {
            writer.write_sample(0i16).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Speech-to-text double returning a fixed transcription or failing
pub struct MockSpeechToText {
    response: Option<RawTranscription>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockSpeechToText {
    pub fn returning(response: RawTranscription) -> Self {
        Self {
            response: Some(response),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Whole-text output without segmentation
    pub fn whole_text(text: &str) -> Self {
        Self::returning(RawTranscription {
            text: text.to_string(),
            segments: None,
            duration: None,
        })
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(
        &self,
        _audio: Vec<u8>,
        _filename: &str,
        _mime_type: &str,
    ) -> Result<RawTranscription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => anyhow::bail!("speech service unavailable"),
        }
    }

    fn name(&self) -> &str {
        "mock-stt"
    }
}

/// Text-generation double.
///
/// Replies `generated #<n>` and records every prompt it receives. Prompts
/// whose system message contains the configured marker fail.
pub struct MockTextGenerator {
    calls: AtomicUsize,
    prompts: Mutex<Vec<Vec<PromptMessage>>>,
    fail_marker: Option<String>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            fail_marker: None,
        }
    }

    pub fn failing_when_system_contains(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<Vec<PromptMessage>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, messages: Vec<PromptMessage>) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let system = messages
            .iter()
            .find(|m| m.role == PromptRole::System)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(messages);

        if let Some(marker) = &self.fail_marker {
            if system.contains(marker.as_str()) {
                anyhow::bail!("model overloaded");
            }
        }
        Ok(format!("generated #{}", n))
    }

    fn name(&self) -> &str {
        "mock-llm"
    }
}

/// Application wired to test doubles and a temporary uploads directory
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub stt: Arc<MockSpeechToText>,
    pub llm: Arc<MockTextGenerator>,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new(stt: MockSpeechToText, llm: MockTextGenerator) -> Result<Self> {
        Self::with_limit(stt, llm, 10 * 1024 * 1024)
    }

    pub fn with_limit(stt: MockSpeechToText, llm: MockTextGenerator, max_bytes: usize) -> Result<Self> {
        let uploads = TempDir::new()?;
        let audio = AudioStorage::new(uploads.path(), max_bytes)?;
        let store = Arc::new(MemoryStore::new());
        let stt = Arc::new(stt);
        let llm = Arc::new(llm);

        let state = AppState::new(store.clone(), audio, stt.clone(), llm.clone());

        Ok(Self {
            state,
            store,
            stt,
            llm,
            uploads,
        })
    }

    /// Wait until `check` holds for the store, failing after two seconds
    pub async fn eventually<F, Fut>(&self, mut check: F) -> bool
    where
        F: FnMut(Arc<MemoryStore>) -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        for _ in 0..200 {
            if check(self.store.clone()).await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    pub async fn summary_count(&self, recording_id: u64) -> usize {
        self.store.list_summaries(recording_id).await.len()
    }
}
