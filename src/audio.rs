use std::io::{Cursor, Write};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::errors::AudioError;

// @module: PCM audio buffers for the narration canvas

/// Sample rate and channel layout of a PCM buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// The frame index corresponding to a millisecond offset
    fn frame_at_ms(&self, ms: u64) -> usize {
        (ms * self.sample_rate as u64 / 1000) as usize
    }
}

/// In-memory PCM audio: interleaved 16-bit samples plus their format.
///
/// Used both for decoded synthesis clips and for the narration canvas the
/// clips are overlaid onto.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    format: AudioFormat,
    samples: Vec<i16>,
}

impl AudioBuffer {
    /// A silent buffer of exactly `duration_ms` milliseconds
    pub fn silent(format: AudioFormat, duration_ms: u64) -> Self {
        let frames = format.frame_at_ms(duration_ms);
        Self {
            format,
            samples: vec![0; frames * format.channels as usize],
        }
    }

    /// Decode a WAV byte stream into a PCM buffer.
    ///
    /// Accepts 16-bit integer and 32-bit float sample formats; floats are
    /// converted to 16-bit.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        let mut reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| AudioError::WavDecode(e.to_string()))?;
        let spec = reader.spec();
        let format = AudioFormat::new(spec.sample_rate, spec.channels);

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => reader
                .samples::<i16>()
                .collect::<Result<Vec<i16>, _>>()
                .map_err(|e| AudioError::WavDecode(e.to_string()))?,
            (SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<Result<Vec<i16>, _>>()
                .map_err(|e| AudioError::WavDecode(e.to_string()))?,
            (sample_format, bits) => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{:?} {} bits per sample",
                    sample_format, bits
                )));
            }
        };

        Ok(Self { format, samples })
    }

    /// Build a buffer directly from interleaved samples - used by tests
    #[allow(dead_code)]
    pub fn from_samples(format: AudioFormat, samples: Vec<i16>) -> Self {
        Self { format, samples }
    }

    #[allow(dead_code)]
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Interleaved samples - used by tests and external consumers
    #[allow(dead_code)]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels as usize
    }

    /// Duration in milliseconds, rounded down to the nearest millisecond
    pub fn duration_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / self.format.sample_rate as u64
    }

    /// Shorten the buffer to at most `duration_ms`; trailing audio is
    /// discarded. A no-op when the buffer is already short enough.
    pub fn truncate_to_ms(&mut self, duration_ms: u64) {
        let keep = self.format.frame_at_ms(duration_ms) * self.format.channels as usize;
        if keep < self.samples.len() {
            self.samples.truncate(keep);
        }
    }

    /// Additively mix `clip` into this buffer starting at `position_ms`.
    ///
    /// Existing content is kept; mixed samples saturate at the i16 range.
    /// Clip samples that fall past the end of this buffer are dropped, the
    /// buffer never grows.
    pub fn overlay_at(&mut self, clip: &AudioBuffer, position_ms: u64) -> Result<(), AudioError> {
        if clip.format != self.format {
            return Err(AudioError::FormatMismatch {
                expected_rate: self.format.sample_rate,
                expected_channels: self.format.channels,
                actual_rate: clip.format.sample_rate,
                actual_channels: clip.format.channels,
            });
        }

        let offset = self.format.frame_at_ms(position_ms) * self.format.channels as usize;
        for (i, &sample) in clip.samples.iter().enumerate() {
            let Some(slot) = self.samples.get_mut(offset + i) else {
                break;
            };
            *slot = slot.saturating_add(sample);
        }

        Ok(())
    }

    /// Write the buffer as a 16-bit PCM WAV stream
    pub fn write_wav<W: Write + std::io::Seek>(&self, writer: W) -> Result<(), AudioError> {
        let spec = WavSpec {
            channels: self.format.channels,
            sample_rate: self.format.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut wav = WavWriter::new(writer, spec)
            .map_err(|e| AudioError::WavEncode(e.to_string()))?;
        for &sample in &self.samples {
            wav.write_sample(sample)
                .map_err(|e| AudioError::WavEncode(e.to_string()))?;
        }
        wav.finalize()
            .map_err(|e| AudioError::WavEncode(e.to_string()))?;

        Ok(())
    }
}
