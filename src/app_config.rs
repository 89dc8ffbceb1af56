use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Voice label used for narration ("female-like" or "male-like");
    /// unknown labels fall back to the default voice
    #[serde(default = "default_voice_label")]
    pub voice: String,

    /// Clip placement policy
    #[serde(default)]
    pub clip_policy: ClipPolicy,

    /// Speech synthesis config
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Audio canvas config
    #[serde(default)]
    pub audio: AudioConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            voice: default_voice_label(),
            clip_policy: ClipPolicy::default(),
            synthesis: SynthesisConfig::default(),
            audio: AudioConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and CLI overrides
    pub fn validate(&self) -> Result<()> {
        if self.synthesis.model.is_empty() {
            return Err(anyhow!("Synthesis model must not be empty"));
        }
        if self.synthesis.endpoint.is_empty() {
            return Err(anyhow!("Synthesis endpoint must not be empty"));
        }
        if self.synthesis.timeout_secs == 0 {
            return Err(anyhow!("Synthesis timeout must be greater than zero"));
        }
        if self.audio.sample_rate == 0 {
            return Err(anyhow!("Audio sample rate must be greater than zero"));
        }
        if self.audio.channels == 0 {
            return Err(anyhow!("Audio channel count must be greater than zero"));
        }
        Ok(())
    }
}

/// User-facing voice label, mapped to a provider-specific voice identifier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceLabel {
    // @voice: female-like tone
    #[default]
    FemaleLike,
    // @voice: male-like tone
    MaleLike,
}

impl VoiceLabel {
    // @returns: Provider voice identifier for this label
    pub fn provider_voice(&self) -> &'static str {
        match self {
            Self::FemaleLike => "alloy",
            Self::MaleLike => "verse",
        }
    }

    // @returns: User-facing label string
    pub fn label(&self) -> &'static str {
        match self {
            Self::FemaleLike => "female-like",
            Self::MaleLike => "male-like",
        }
    }

    /// Resolve a free-form label, falling back to the default voice
    /// for unrecognized input instead of failing.
    pub fn resolve(label: &str) -> Self {
        match label.parse() {
            Ok(voice) => voice,
            Err(_) => {
                log::warn!("Unknown voice label '{}', using default '{}'", label, Self::default().label());
                Self::default()
            }
        }
    }
}

// Implement Display trait for VoiceLabel
impl std::fmt::Display for VoiceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Implement FromStr trait for VoiceLabel
impl std::str::FromStr for VoiceLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "female-like" => Ok(Self::FemaleLike),
            "male-like" => Ok(Self::MaleLike),
            _ => Err(anyhow!("Invalid voice label: {}", s)),
        }
    }
}

/// Policy deciding how synthesized clips are fitted to their caption window
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClipPolicy {
    /// Truncate a clip to its window only when the clip overruns a window
    /// longer than 500 ms; shorter windows keep the clip's natural length,
    /// so long clips may bleed into the next caption's region
    #[default]
    Overlay,
    /// Hard-clip every clip to its caption window
    Strict,
}

impl ClipPolicy {
    // @returns: Lowercase policy identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Overlay => "overlay".to_string(),
            Self::Strict => "strict".to_string(),
        }
    }
}

impl std::fmt::Display for ClipPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Speech synthesis service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Model name (e.g., "gpt-4o-mini-tts")
    #[serde(default = "default_synthesis_model")]
    pub model: String,

    /// API key for the service; when empty the OPENAI_API_KEY environment
    /// variable is used instead. Never logged.
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, for Azure OpenAI or self-hosted)
    #[serde(default = "default_synthesis_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            model: default_synthesis_model(),
            api_key: String::new(),
            endpoint: default_synthesis_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Audio canvas configuration; must match the provider's WAV output format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AudioConfig {
    /// Canvas sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Canvas channel count
    #[serde(default = "default_channels")]
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_voice_label() -> String {
    "female-like".to_string()
}

fn default_synthesis_model() -> String {
    "gpt-4o-mini-tts".to_string()
}

fn default_synthesis_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_sample_rate() -> u32 {
    // OpenAI speech responses are 24 kHz mono PCM
    24_000
}

fn default_channels() -> u16 {
    1
}
