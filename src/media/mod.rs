//! Media container layer: demuxing audio, probing duration, remuxing.
//!
//! The pipeline only talks to the [`MediaTool`] trait, so tests can inject a
//! fake that records calls instead of spawning ffmpeg.

pub mod executor;
pub mod ffmpeg;

use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

pub use executor::{CommandExecutor, SystemCommandExecutor};
pub use ffmpeg::FfmpegTool;

/// Subprocess-backed media operations.
pub trait MediaTool: Send + Sync {
    /// Decode the audio of `input` into a mono 16-bit WAV at `sample_rate`.
    fn extract_audio(&self, input: &Path, output: &Path, sample_rate: u32) -> Result<()>;

    /// Total duration of `input` in seconds.
    fn probe_duration(&self, input: &Path) -> Result<f64>;

    /// Copy the video stream of `video` untouched and replace its audio with
    /// `audio`, stopping at the shorter of the two.
    fn replace_audio(&self, video: &Path, audio: &Path, output: &Path) -> Result<()>;
}

impl<T: MediaTool + ?Sized> MediaTool for Arc<T> {
    fn extract_audio(&self, input: &Path, output: &Path, sample_rate: u32) -> Result<()> {
        (**self).extract_audio(input, output, sample_rate)
    }

    fn probe_duration(&self, input: &Path) -> Result<f64> {
        (**self).probe_duration(input)
    }

    fn replace_audio(&self, video: &Path, audio: &Path, output: &Path) -> Result<()> {
        (**self).replace_audio(video, audio, output)
    }
}
