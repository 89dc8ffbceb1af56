/*!
 * # subvoice - Subtitle narration
 *
 * A Rust library for turning SRT subtitle files into a single narrated
 * audio track using AI speech synthesis.
 *
 * ## Features
 *
 * - Parse SRT subtitle files into timed caption entries
 * - Synthesize speech per caption via the OpenAI speech API
 * - Place each clip at its caption's original timestamp on a silent canvas
 * - Export the assembled track as MP3 next to the input file
 * - Two voice labels ("female-like", "male-like") mapped to provider voices
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle file parsing
 * - `providers`: Speech synthesis clients:
 *   - `providers::openai`: OpenAI speech API client
 * - `audio`: PCM buffers, WAV decode/encode, overlay and truncation
 * - `timeline`: Timeline assembly - the placement algorithm
 * - `encoder`: MP3 export through ffmpeg
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod encoder;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::{ClipPolicy, Config, VoiceLabel};
pub use app_controller::Controller;
pub use audio::{AudioBuffer, AudioFormat};
pub use errors::{AppError, AssemblyError, AudioError, ExportError, ProviderError, SubtitleError};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use timeline::TimelineAssembler;
