use crate::audio::{speed, wav};
use crate::error::Result;
use std::path::Path;

/// Convert a time in seconds to a sample count at `sample_rate`.
///
/// Negative and non-finite inputs map to zero.
pub fn seconds_to_samples(seconds: f64, sample_rate: u32) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * sample_rate as f64).round() as usize
}

/// Immutable mono PCM clip.
///
/// The duration is derived from the sample count, so it can never drift from
/// the buffer it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A clip of digital silence lasting `seconds`.
    pub fn silent(seconds: f64, sample_rate: u32) -> Self {
        Self::new(vec![0; seconds_to_samples(seconds, sample_rate)], sample_rate)
    }

    pub fn from_wav_file(path: &Path, sample_rate: u32) -> Result<Self> {
        wav::read_wav_file(path, sample_rate)
    }

    pub fn write_wav_file(&self, path: &Path) -> Result<()> {
        wav::write_wav_file(self, path)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Copy out `[start, end)` seconds, clamped to the clip bounds.
    pub fn slice_secs(&self, start: f64, end: f64) -> Self {
        let from = seconds_to_samples(start, self.sample_rate).min(self.samples.len());
        let to = seconds_to_samples(end, self.sample_rate).min(self.samples.len());
        let to = to.max(from);
        Self::new(self.samples[from..to].to_vec(), self.sample_rate)
    }

    /// Keep at most the first `len` samples.
    pub fn trimmed(&self, len: usize) -> Self {
        let end = len.min(self.samples.len());
        Self::new(self.samples[..end].to_vec(), self.sample_rate)
    }

    /// Append trailing silence until the clip holds `len` samples.
    pub fn padded(&self, len: usize) -> Self {
        let mut samples = self.samples.clone();
        if samples.len() < len {
            samples.resize(len, 0);
        }
        Self::new(samples, self.sample_rate)
    }

    /// Trim or pad to exactly `len` samples.
    pub fn fitted(&self, len: usize) -> Self {
        if self.samples.len() > len {
            self.trimmed(len)
        } else {
            self.padded(len)
        }
    }

    /// Play the clip `factor` times faster without shifting its pitch.
    ///
    /// Factors at or below 1.0 return an unchanged copy; clips are never slowed down.
    pub fn sped_up(&self, factor: f64) -> Self {
        Self::new(
            speed::time_compress(&self.samples, self.sample_rate, factor),
            self.sample_rate,
        )
    }

    /// Peak absolute amplitude, used to tell speech from silence.
    pub fn peak(&self) -> i16 {
        self.samples
            .iter()
            .map(|s| s.saturating_abs())
            .max()
            .unwrap_or(0)
    }
}
