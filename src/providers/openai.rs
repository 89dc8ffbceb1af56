use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::app_config::SynthesisConfig;
use crate::errors::ProviderError;
use crate::providers::TtsProvider;

/// Environment variable holding the API key when the config leaves it empty
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI client for the speech synthesis API
pub struct OpenAiTts {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model used for synthesis
    model: String,
}

// Manual Debug so the API key can never leak through logging
impl std::fmt::Debug for OpenAiTts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTts")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// OpenAI speech request
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    /// The model to use
    model: &'a str,

    /// Provider voice identifier
    voice: &'a str,

    /// Text to synthesize
    input: &'a str,

    /// Audio container for the response; WAV decodes without extra codecs
    response_format: &'static str,
}

impl OpenAiTts {
    /// Create a new client from the synthesis configuration.
    ///
    /// The API key comes from the config or, when that is empty, from the
    /// OPENAI_API_KEY environment variable. A missing key fails here,
    /// before any network call.
    pub fn new(config: &SynthesisConfig) -> Result<Self, ProviderError> {
        let api_key = if config.api_key.is_empty() {
            std::env::var(API_KEY_ENV).map_err(|_| {
                ProviderError::AuthenticationError(format!(
                    "no API key configured and {} is not set",
                    API_KEY_ENV
                ))
            })?
        } else {
            config.api_key.clone()
        };

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Model name used for synthesis
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TtsProvider for OpenAiTts {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, ProviderError> {
        let api_url = format!("{}/audio/speech", self.endpoint);
        let request = SpeechRequest {
            model: &self.model,
            voice: voice_id,
            input: text,
            response_format: "wav",
        };

        debug!("Requesting synthesis of {} chars with voice '{}'", text.len(), voice_id);

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(ProviderError::AuthenticationError(error_text));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))
    }
}
