/*!
 * Provider implementations for speech synthesis.
 *
 * This module contains the client used to turn caption text into audio:
 * - OpenAI: `/v1/audio/speech` endpoint returning WAV bytes
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for speech-synthesis providers
///
/// This trait defines the interface that provider implementations must
/// follow, allowing the timeline assembler to stay provider-agnostic
/// (and tests to substitute a deterministic stub).
#[async_trait]
pub trait TtsProvider: Send + Sync + Debug {
    /// Human-readable provider name, used for logging
    fn name(&self) -> &str;

    /// Synthesize one text string with the given provider voice identifier
    ///
    /// # Arguments
    /// * `text` - Non-empty caption text to speak
    /// * `voice_id` - Provider-specific voice identifier
    ///
    /// # Returns
    /// * `Result<Bytes, ProviderError>` - Raw WAV bytes or an error; failures
    ///   are never retried here and abort the whole run
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, ProviderError>;
}

pub mod openai;
