use log::{debug, info};

use crate::app_config::ClipPolicy;
use crate::audio::{AudioBuffer, AudioFormat};
use crate::errors::AssemblyError;
use crate::providers::TtsProvider;
use crate::subtitle_processor::SubtitleEntry;

// @module: Timeline assembly - placing synthesized clips on a silent canvas

/// Silence appended after the last caption's end, fixing the track length
pub const TAIL_PAD_MS: u64 = 1_000;

/// Captions whose window is at or below this length never get truncated,
/// even when the synthesized clip overruns the window
pub const MIN_TRUNCATE_WINDOW_MS: u64 = 500;

/// Characters of caption text shown in per-caption progress lines
const PREVIEW_CHARS: usize = 60;

/// Assembles synthesized caption clips into one continuous audio track.
///
/// Clips are anchored to their caption's absolute start offset rather than
/// concatenated, so the narration stays synchronized with the source timing.
pub struct TimelineAssembler {
    /// Canvas format; every decoded clip must match it
    format: AudioFormat,
    /// Truncation/placement policy
    policy: ClipPolicy,
}

impl TimelineAssembler {
    pub fn new(format: AudioFormat, policy: ClipPolicy) -> Self {
        Self { format, policy }
    }

    /// Build the narration track for the given captions.
    ///
    /// Returns `Ok(None)` when there are no captions. Synthesis runs
    /// sequentially in caption order; the first failure aborts the whole
    /// assembly with no partial track. `on_progress` is called after every
    /// caption, including skipped ones, with (completed, total).
    pub async fn assemble<P, F>(
        &self,
        entries: &[SubtitleEntry],
        provider: &P,
        voice_id: &str,
        mut on_progress: F,
    ) -> Result<Option<AudioBuffer>, AssemblyError>
    where
        P: TtsProvider + ?Sized,
        F: FnMut(usize, usize),
    {
        let Some(last) = entries.last() else {
            return Ok(None);
        };

        // Track length is fixed up front from the last caption in file
        // order, matching the source ordering the pipeline trusts.
        let total_duration_ms = last.end_time_ms + TAIL_PAD_MS;
        let mut canvas = AudioBuffer::silent(self.format, total_duration_ms);
        let total = entries.len();

        for (i, entry) in entries.iter().enumerate() {
            let index = i + 1;

            if entry.text.trim().is_empty() {
                debug!("[{}/{}] Skipping caption with no text", index, total);
                on_progress(index, total);
                continue;
            }

            info!("[{}/{}] Synthesizing: {}", index, total, preview(&entry.text));

            let wav_bytes = provider.synthesize(&entry.text, voice_id).await?;
            let mut clip = AudioBuffer::from_wav_bytes(&wav_bytes)?;

            let target_duration_ms = entry.window_ms();
            let clip_duration_ms = clip.duration_ms();

            if self.should_truncate(clip_duration_ms, target_duration_ms) {
                debug!(
                    "[{}/{}] Truncating clip from {} ms to {} ms window",
                    index, total, clip_duration_ms, target_duration_ms
                );
                clip.truncate_to_ms(target_duration_ms);
            }

            // Additive overlay keeps whatever is already on the canvas, so
            // an untruncated clip may bleed into the next caption's region.
            canvas.overlay_at(&clip, entry.start_time_ms)?;
            on_progress(index, total);
        }

        Ok(Some(canvas))
    }

    // Truncation rule: under the default policy only clips that overrun a
    // window longer than MIN_TRUNCATE_WINDOW_MS get shortened; strict mode
    // fits every clip to its window.
    fn should_truncate(&self, clip_duration_ms: u64, target_duration_ms: u64) -> bool {
        match self.policy {
            ClipPolicy::Overlay => {
                clip_duration_ms > target_duration_ms
                    && target_duration_ms > MIN_TRUNCATE_WINDOW_MS
            }
            ClipPolicy::Strict => clip_duration_ms > target_duration_ms,
        }
    }
}

/// Shorten caption text to a single-line progress preview
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}
