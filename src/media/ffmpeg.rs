//! ffmpeg/ffprobe implementation of the media tool.

use crate::error::{RedubError, Result};
use crate::media::MediaTool;
use crate::media::executor::{CommandExecutor, SystemCommandExecutor};
use std::path::Path;

/// Media tool backed by the ffmpeg and ffprobe binaries.
pub struct FfmpegTool<E: CommandExecutor> {
    executor: E,
    ffmpeg: String,
    ffprobe: String,
}

impl<E: CommandExecutor> FfmpegTool<E> {
    pub fn new(executor: E, ffmpeg: &str, ffprobe: &str) -> Self {
        Self {
            executor,
            ffmpeg: ffmpeg.to_string(),
            ffprobe: ffprobe.to_string(),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn run_ffmpeg(&self, args: &[&str]) -> Result<String> {
        let mut full = vec!["-nostdin", "-hide_banner", "-loglevel", "error", "-y"];
        full.extend_from_slice(args);
        self.executor.execute(&self.ffmpeg, &full)
    }
}

impl FfmpegTool<SystemCommandExecutor> {
    /// Create a tool that spawns the given binaries.
    pub fn system(ffmpeg: &str, ffprobe: &str) -> Self {
        Self::new(SystemCommandExecutor::new(), ffmpeg, ffprobe)
    }
}

impl<E: CommandExecutor> MediaTool for FfmpegTool<E> {
    fn extract_audio(&self, input: &Path, output: &Path, sample_rate: u32) -> Result<()> {
        let rate = sample_rate.to_string();
        self.run_ffmpeg(&[
            "-i",
            path_arg(input)?,
            "-vn",
            "-ac",
            "1",
            "-ar",
            rate.as_str(),
            "-c:a",
            "pcm_s16le",
            path_arg(output)?,
        ])?;
        Ok(())
    }

    fn probe_duration(&self, input: &Path) -> Result<f64> {
        let stdout = self.executor.execute(
            &self.ffprobe,
            &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                path_arg(input)?,
            ],
        )?;
        parse_duration(&stdout)
    }

    fn replace_audio(&self, video: &Path, audio: &Path, output: &Path) -> Result<()> {
        self.run_ffmpeg(&[
            "-i",
            path_arg(video)?,
            "-i",
            path_arg(audio)?,
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-shortest",
            path_arg(output)?,
        ])?;
        Ok(())
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| RedubError::Other(format!("Path is not valid UTF-8: {}", path.display())))
}

/// Parse ffprobe's bare `format=duration` output.
fn parse_duration(stdout: &str) -> Result<f64> {
    let trimmed = stdout.trim();
    let duration: f64 = trimmed.parse().map_err(|_| RedubError::MediaProbe {
        message: format!("unexpected ffprobe output '{}'", trimmed),
    })?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(RedubError::MediaProbe {
            message: format!("media reports a duration of {}", trimmed),
        });
    }
    Ok(duration)
}
