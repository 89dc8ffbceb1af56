/*!
 * Error types for the subvoice application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the speech-synthesis provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while reading or parsing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Error reading the subtitle file from disk
    #[error("Failed to read subtitle file {path}: {source}")]
    Read {
        /// Path of the file that could not be read
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Content is not in the expected SRT format
    #[error("Malformed SRT content: {0}")]
    Malformed(String),

    /// Timestamp line could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Errors that can occur while decoding or manipulating PCM audio
#[derive(Error, Debug)]
pub enum AudioError {
    /// Error decoding WAV bytes returned by the provider
    #[error("Failed to decode WAV data: {0}")]
    WavDecode(String),

    /// Sample format the decoder does not support
    #[error("Unsupported WAV sample format: {0}")]
    UnsupportedFormat(String),

    /// Clip format does not match the canvas format
    #[error("Audio format mismatch: expected {expected_rate} Hz / {expected_channels} ch, got {actual_rate} Hz / {actual_channels} ch")]
    FormatMismatch {
        expected_rate: u32,
        expected_channels: u16,
        actual_rate: u32,
        actual_channels: u16,
    },

    /// Error writing WAV output
    #[error("Failed to write WAV data: {0}")]
    WavEncode(String),
}

/// Errors that can occur during timeline assembly
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error with the synthesized audio
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// The assembler produced no track; only possible on empty caption
    /// input, which the orchestrator guards against
    #[error("Assembly produced no track (no captions)")]
    EmptyTimeline,
}

/// Errors that can occur while encoding and writing the output file
#[derive(Error, Debug)]
pub enum ExportError {
    /// Error writing intermediate or final files
    #[error("IO error during export: {0}")]
    Io(#[from] std::io::Error),

    /// ffmpeg could not be started or exited with an error
    #[error("MP3 encoding failed: {0}")]
    Encode(String),

    /// ffmpeg did not finish within the configured timeout
    #[error("MP3 encoding timed out after {0} seconds")]
    Timeout(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// The subtitle file parsed but contains no captions
    #[error("No captions found in {0}")]
    EmptyInput(String),

    /// Error from timeline assembly (provider or audio failure)
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Error from a provider outside of assembly (e.g. missing credentials)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from encoding or writing the output file
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
