use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::app_config::{Config, VoiceLabel};
use crate::audio::AudioFormat;
use crate::encoder;
use crate::errors::{AppError, AssemblyError};
use crate::file_utils::FileManager;
use crate::providers::openai::OpenAiTts;
use crate::providers::TtsProvider;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::timeline::TimelineAssembler;

// @module: Application controller for subtitle narration

/// Main application controller driving the narration pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    #[allow(dead_code)]
    pub fn new_for_test() -> Result<Self, AppError> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full workflow: parse captions, synthesize with the configured
    /// provider, assemble the track and export it as MP3 next to the input.
    ///
    /// Returns the output file path on success.
    pub async fn run(&self, input_file: &Path) -> Result<PathBuf, AppError> {
        let entries = self.load_captions(input_file)?;

        // Provider construction resolves credentials; it runs after the
        // empty-input guard so a blank file never needs an API key.
        let provider = OpenAiTts::new(&self.config.synthesis)?;
        info!(
            "🚀 subvoice: {} - {} (voice: {})",
            provider.name(),
            provider.model(),
            VoiceLabel::resolve(&self.config.voice)
        );

        self.synthesize_and_export(input_file, &entries, &provider)
            .await
    }

    /// Parse the subtitle file and apply the empty-input guard
    pub fn load_captions(&self, input_file: &Path) -> Result<Vec<SubtitleEntry>, AppError> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!(
                "Input file does not exist: {:?}",
                input_file
            )));
        }

        let entries = SubtitleCollection::parse_srt_file(input_file)?;
        if entries.is_empty() {
            return Err(AppError::EmptyInput(input_file.display().to_string()));
        }

        info!("Found {} caption(s) in {:?}", entries.len(), input_file);
        Ok(entries)
    }

    /// Assemble the narration track for already-parsed captions and encode
    /// it to MP3. Split out from [`run`] so tests can substitute a
    /// deterministic provider.
    pub async fn synthesize_and_export<P>(
        &self,
        input_file: &Path,
        entries: &[SubtitleEntry],
        provider: &P,
    ) -> Result<PathBuf, AppError>
    where
        P: TtsProvider + ?Sized,
    {
        // Start timing the process
        let start_time = std::time::Instant::now();

        let voice = VoiceLabel::resolve(&self.config.voice);
        let assembler = TimelineAssembler::new(
            AudioFormat::new(self.config.audio.sample_rate, self.config.audio.channels),
            self.config.clip_policy,
        );

        // Create a progress bar for synthesis tracking
        let progress_bar = ProgressBar::new(entries.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} captions ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Synthesizing");

        let pb = progress_bar.clone();
        let track = assembler
            .assemble(entries, provider, voice.provider_voice(), move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await?;

        progress_bar.finish_and_clear();

        let track = track.ok_or(AssemblyError::EmptyTimeline)?;
        info!("Assembled {} ms of audio", track.duration_ms());

        let output_path = FileManager::narration_output_path(input_file);
        encoder::encode_to_mp3(&track, &output_path).await?;

        info!(
            "Success: {} ({})",
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(output_path)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
