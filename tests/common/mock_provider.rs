/*!
 * Deterministic mock speech provider for testing the narration pipeline
 * without network access.
 */

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use hound::{SampleFormat, WavSpec, WavWriter};

use subvoice::audio::AudioFormat;
use subvoice::errors::ProviderError;
use subvoice::providers::TtsProvider;

/// Constant sample value the mock fills its clips with; lets tests tell
/// silence (0), one clip (1000) and two overlaid clips (2000) apart.
pub const MOCK_AMPLITUDE: i16 = 1000;

/// Mock TTS provider producing deterministic WAV clips.
///
/// Every call yields a clip of constant-amplitude samples with a fixed
/// duration (optionally overridden per text). Calls are recorded in order,
/// and a failure can be injected at a specific call index.
#[derive(Debug)]
pub struct MockTtsProvider {
    format: AudioFormat,
    clip_ms: u64,
    clip_ms_by_text: HashMap<String, u64>,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<String>>,
}

impl MockTtsProvider {
    /// Mock matching the default canvas format (24 kHz mono)
    pub fn new(format: AudioFormat) -> Self {
        Self {
            format,
            clip_ms: 1000,
            clip_ms_by_text: HashMap::new(),
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Default duration for every synthesized clip
    pub fn with_clip_ms(mut self, clip_ms: u64) -> Self {
        self.clip_ms = clip_ms;
        self
    }

    /// Duration for clips whose text matches exactly
    pub fn with_clip_ms_for(mut self, text: &str, clip_ms: u64) -> Self {
        self.clip_ms_by_text.insert(text.to_string(), clip_ms);
        self
    }

    /// Inject a failure on the n-th synthesize call (1-based)
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Texts synthesized so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of synthesize calls made
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn wav_clip(&self, duration_ms: u64) -> Vec<u8> {
        let spec = WavSpec {
            channels: self.format.channels,
            sample_rate: self.format.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let frames = (duration_ms * self.format.sample_rate as u64 / 1000) as usize;
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames * self.format.channels as usize {
                writer.write_sample(MOCK_AMPLITUDE).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }
}

#[async_trait]
impl TtsProvider for MockTtsProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn synthesize(&self, text: &str, _voice_id: &str) -> Result<Bytes, ProviderError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            calls.len()
        };

        if self.fail_on_call == Some(call_index) {
            return Err(ProviderError::RequestFailed(format!(
                "injected failure on call {}",
                call_index
            )));
        }

        let duration_ms = self
            .clip_ms_by_text
            .get(text)
            .copied()
            .unwrap_or(self.clip_ms);

        Ok(Bytes::from(self.wav_clip(duration_ms)))
    }
}
