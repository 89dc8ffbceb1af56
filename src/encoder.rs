use std::io::BufWriter;
use std::path::Path;

use log::{debug, error};
use tokio::process::Command;

use crate::audio::AudioBuffer;
use crate::errors::ExportError;

// @module: MP3 export via ffmpeg

/// Upper bound for one ffmpeg invocation
const FFMPEG_TIMEOUT_SECS: u64 = 120;

/// Encode the assembled track to an MP3 file at `output_path`.
///
/// The track is written to a temporary WAV file and handed to ffmpeg with
/// the libmp3lame codec. Any existing file at `output_path` is overwritten;
/// on failure a partially written output is removed so no invalid file is
/// left behind.
pub async fn encode_to_mp3(track: &AudioBuffer, output_path: &Path) -> Result<(), ExportError> {
    let wav_temp = tempfile::Builder::new()
        .prefix("subvoice-")
        .suffix(".wav")
        .tempfile()?;

    track
        .write_wav(BufWriter::new(wav_temp.reopen()?))
        .map_err(|e| ExportError::Encode(e.to_string()))?;

    debug!(
        "Encoding {} ms of audio to {}",
        track.duration_ms(),
        output_path.display()
    );

    // Add timeout to prevent hanging on a wedged encoder
    let ffmpeg_future = Command::new("ffmpeg")
        .args([
            "-y", // Overwrite existing file
            "-i",
            wav_temp.path().to_str().unwrap_or_default(),
            "-codec:a",
            "libmp3lame",
            "-q:a",
            "2",
            output_path.to_str().unwrap_or_default(),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(FFMPEG_TIMEOUT_SECS);
    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| ExportError::Encode(format!("Failed to execute ffmpeg for MP3 encoding: {}", e)))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            discard_partial_output(output_path);
            return Err(ExportError::Timeout(FFMPEG_TIMEOUT_SECS));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("MP3 encoding failed: {}", filtered);
        discard_partial_output(output_path);
        return Err(ExportError::Encode(filtered));
    }

    Ok(())
}

/// Remove whatever ffmpeg managed to write before failing
fn discard_partial_output(output_path: &Path) {
    if output_path.exists() {
        let _ = std::fs::remove_file(output_path);
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
