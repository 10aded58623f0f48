use crate::defaults;
use crate::error::{RedubError, Result};
use crate::languages::resolve_language;
use crate::translate::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub stt: SttConfig,
    pub translation: TranslationConfig,
    pub synthesis: SynthesisConfig,
    pub audio: AudioConfig,
    pub media: MediaConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    /// Whisper model name (e.g., "base", "small.en")
    pub model: String,
    /// Spoken language of the input videos
    pub language: String,
    /// Inference threads (None = whisper.cpp default)
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub source_language: String,
    pub target_language: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub retry_delay_step_ms: u64,
    /// Pause after every N translated segments (0 disables)
    pub rate_limit_every: u32,
    pub rate_limit_pause_ms: u64,
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Ask for the slower speaking rate
    pub slow: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Where dubbed videos go (None = next to the input)
    pub directory: Option<PathBuf>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::SOURCE_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            max_attempts: defaults::MAX_TRANSLATION_ATTEMPTS,
            retry_delay_ms: defaults::RETRY_DELAY_MS,
            retry_delay_step_ms: defaults::RETRY_DELAY_STEP_MS,
            rate_limit_every: defaults::RATE_LIMIT_EVERY,
            rate_limit_pause_ms: defaults::RATE_LIMIT_PAUSE_MS,
            endpoint: crate::translate::google::DEFAULT_ENDPOINT.to_string(),
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: crate::tts::google::DEFAULT_ENDPOINT.to_string(),
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            slow: false,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl TranslationConfig {
    /// Retry and pacing policy for the translation stage.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            retry_delay_step: Duration::from_millis(self.retry_delay_step_ms),
            rate_limit_every: self.rate_limit_every,
            rate_limit_pause: Duration::from_millis(self.rate_limit_pause_ms),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RedubError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                RedubError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(RedubError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported variables:
    /// - REDUB_MODEL: Whisper model name
    /// - REDUB_TARGET_LANGUAGE: dubbing target code
    /// - REDUB_FFMPEG: ffmpeg binary
    /// - REDUB_FFPROBE: ffprobe binary
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("REDUB_MODEL")
            && !model.is_empty()
        {
            self.stt.model = model;
        }

        if let Ok(target) = std::env::var("REDUB_TARGET_LANGUAGE")
            && !target.is_empty()
        {
            self.translation.target_language = target;
        }

        if let Ok(ffmpeg) = std::env::var("REDUB_FFMPEG")
            && !ffmpeg.is_empty()
        {
            self.media.ffmpeg = ffmpeg;
        }

        if let Ok(ffprobe) = std::env::var("REDUB_FFPROBE")
            && !ffprobe.is_empty()
        {
            self.media.ffprobe = ffprobe;
        }

        self
    }

    /// Check values that would only fail deep inside a run.
    pub fn validate(&self) -> Result<()> {
        resolve_language(&self.translation.target_language)?;

        if self.translation.max_attempts == 0 {
            return Err(invalid("translation.max_attempts", "must be at least 1"));
        }
        if self.audio.sample_rate < 8000 {
            return Err(invalid("audio.sample_rate", "must be at least 8000 Hz"));
        }
        if self.translation.timeout_secs == 0 {
            return Err(invalid("translation.timeout_secs", "must be at least 1"));
        }
        if self.synthesis.timeout_secs == 0 {
            return Err(invalid("synthesis.timeout_secs", "must be at least 1"));
        }
        if self.stt.model.trim().is_empty() {
            return Err(invalid("stt.model", "must not be empty"));
        }
        if self.stt.threads == Some(0) {
            return Err(invalid("stt.threads", "must be at least 1"));
        }
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RedubError::Other(format!("Failed to serialize config: {e}")))
    }

    /// `~/.config/redub/config.toml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("redub")
            .join("config.toml")
    }
}

fn invalid(key: &str, message: &str) -> RedubError {
    RedubError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
