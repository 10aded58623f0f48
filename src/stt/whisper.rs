//! Whisper-based speech-to-text transcription.
//!
//! This module provides a Whisper implementation of the Transcriber trait using whisper-rs.
//!
//! # Feature Gate
//!
//! This module requires the `whisper` feature to be enabled and cmake to be installed.
//! To build with Whisper support:
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::defaults;
use crate::error::{RedubError, Result};
use crate::pipeline::types::{Segment, Transcript};
use crate::stt::transcriber::Transcriber;
use std::path::PathBuf;

#[cfg(feature = "whisper")]
use crate::stt::transcriber::audio_duration;
#[cfg(feature = "whisper")]
use std::sync::{Mutex, Once};
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,
    /// Spoken language of the source audio (e.g., "en")
    pub language: String,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.bin"),
            language: defaults::SOURCE_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

/// Whisper-based transcriber implementation.
///
/// The WhisperContext is wrapped in a Mutex to ensure thread safety.
#[cfg(feature = "whisper")]
pub struct WhisperTranscriber {
    context: Mutex<WhisperContext>,
    config: WhisperConfig,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

/// Whisper-based transcriber placeholder (without whisper feature).
///
/// This is a stub implementation that returns errors when used.
/// Enable the `whisper` feature to use real transcription.
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperTranscriber {
    config: WhisperConfig,
    model_name: String,
}

fn model_name_from_path(config: &WhisperConfig) -> String {
    config
        .model_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Convert i16 audio samples to f32 normalized to [-1.0, 1.0]
pub fn convert_audio(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&sample| sample as f32 / 32768.0)
        .collect()
}

/// Turn raw `(start_cs, end_cs, text)` spans into transcript segments.
///
/// Whisper reports timestamps in centiseconds. Blank text and empty or
/// inverted intervals are dropped; ends are clamped to the audio duration.
pub fn segments_from_centiseconds(spans: &[(i64, i64, String)], duration: f64) -> Transcript {
    let mut segments = Vec::new();
    for (start_cs, end_cs, text) in spans {
        let start = (*start_cs as f64 / 100.0).max(0.0);
        let end = (*end_cs as f64 / 100.0).min(duration);
        let text = text.trim();
        if text.is_empty() || end <= start {
            continue;
        }
        segments.push(Segment::new(segments.len(), start, end, text));
    }
    Transcript { segments, duration }
}

#[cfg(feature = "whisper")]
impl WhisperTranscriber {
    /// Create a new Whisper transcriber.
    ///
    /// # Errors
    /// Returns `RedubError::TranscriptionModelNotFound` if the model file doesn't exist
    /// Returns `RedubError::TranscriptionInferenceFailed` if model loading fails
    pub fn new(config: WhisperConfig) -> Result<Self> {
        // Install logging hooks to suppress whisper.cpp output (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(RedubError::TranscriptionModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_from_path(&config);

        let mut context_params = WhisperContextParameters::default();
        context_params.flash_attn(true);
        let context = WhisperContext::new_with_params(
            config.model_path.to_str().ok_or_else(|| {
                RedubError::TranscriptionInferenceFailed {
                    message: "Invalid UTF-8 in model path".to_string(),
                }
            })?,
            context_params,
        )
        .map_err(|e| RedubError::TranscriptionInferenceFailed {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context: Mutex::new(context),
            config,
            model_name,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperTranscriber {
    /// Create a new Whisper transcriber (stub implementation).
    ///
    /// Only checks that the model file exists; transcribing always fails.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        if !config.model_path.exists() {
            return Err(RedubError::TranscriptionModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_from_path(&config);
        Ok(Self { config, model_name })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(feature = "whisper")]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, audio: &[i16]) -> Result<Transcript> {
        let audio_f32 = convert_audio(audio);

        let context =
            self.context
                .lock()
                .map_err(|e| RedubError::TranscriptionInferenceFailed {
                    message: format!("Failed to acquire context lock: {}", e),
                })?;

        let mut state =
            context
                .create_state()
                .map_err(|e| RedubError::TranscriptionInferenceFailed {
                    message: format!("Failed to create Whisper state: {}", e),
                })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.config.language));

        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }

        // Disable printing to stdout/stderr
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &audio_f32)
            .map_err(|e| RedubError::TranscriptionInferenceFailed {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let spans: Vec<(i64, i64, String)> = state
            .as_iter()
            .map(|segment| {
                (
                    segment.start_timestamp(),
                    segment.end_timestamp(),
                    segment.to_string(),
                )
            })
            .collect();

        Ok(segments_from_centiseconds(&spans, audio_duration(audio)))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(not(feature = "whisper"))]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, _audio: &[i16]) -> Result<Transcript> {
        Err(RedubError::TranscriptionInferenceFailed {
            message: concat!(
                "Whisper feature not enabled. This binary was built without speech recognition.\n",
                "To fix: cargo build --release (whisper is enabled by default)\n",
                "If build fails with cmake errors, install: sudo apt install cmake"
            )
            .to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_config_default() {
        let config = WhisperConfig::default();
        assert_eq!(config.model_path, PathBuf::from("models/ggml-base.bin"));
        assert_eq!(config.language, "en");
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_whisper_transcriber_new_fails_for_missing_model() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/nonexistent/model.bin"),
            language: "en".to_string(),
            threads: None,
        };

        match WhisperTranscriber::new(config) {
            Err(RedubError::TranscriptionModelNotFound { path }) => {
                assert_eq!(path, "/nonexistent/model.bin");
            }
            _ => panic!("Expected TranscriptionModelNotFound error"),
        }
    }

    #[test]
    fn test_whisper_transcriber_rejects_invalid_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("ggml-base.bin");
        std::fs::write(&model_path, b"fake model data").unwrap();

        let config = WhisperConfig {
            model_path,
            language: "en".to_string(),
            threads: None,
        };

        let result = WhisperTranscriber::new(config);

        // With whisper feature: fails because it's not a valid model file
        // Without whisper feature: succeeds (stub only checks file exists)
        #[cfg(feature = "whisper")]
        assert!(result.is_err(), "Should fail with invalid model file");

        #[cfg(not(feature = "whisper"))]
        {
            let transcriber = result.unwrap();
            assert_eq!(transcriber.model_name(), "ggml-base");
            assert!(!transcriber.is_ready());
            assert!(transcriber.transcribe(&[0i16; 10]).is_err());
        }
    }

    #[test]
    fn test_convert_audio_i16_to_f32() {
        let samples = vec![0i16, 16384, -16384, 32767, -32768];
        let converted = convert_audio(&samples);

        assert_eq!(converted.len(), samples.len());
        assert_eq!(converted[0], 0.0);
        assert!((converted[1] - 0.5).abs() < 0.01);
        assert!((converted[2] + 0.5).abs() < 0.01);
        assert!((converted[3] - 0.999969).abs() < 0.01);
        assert_eq!(converted[4], -1.0);
    }

    #[test]
    fn test_segments_from_centiseconds_converts_and_numbers() {
        let spans = vec![
            (0, 250, " Hello world.".to_string()),
            (300, 520, " How are you?".to_string()),
        ];

        let transcript = segments_from_centiseconds(&spans, 10.0);

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "Hello world.");
        assert!((transcript.segments[1].start - 3.0).abs() < 1e-9);
        assert!((transcript.segments[1].end - 5.2).abs() < 1e-9);
        assert_eq!(transcript.segments[1].index, 1);
        assert_eq!(transcript.duration, 10.0);
    }

    #[test]
    fn test_segments_from_centiseconds_drops_blank_and_empty_spans() {
        let spans = vec![
            (0, 100, "   ".to_string()),
            (200, 200, "zero length".to_string()),
            (300, 400, "kept".to_string()),
            (950, 1200, "runs past the end".to_string()),
        ];

        let transcript = segments_from_centiseconds(&spans, 10.0);

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "kept");
        assert_eq!(transcript.segments[0].index, 0);
        assert_eq!(transcript.segments[1].end, 10.0);
    }

    // Model-backed tests: run when any model is installed,
    // print a visible warning and skip when not.

    #[cfg(all(feature = "whisper", feature = "model-download"))]
    const MODEL_CANDIDATES: &[&str] = &["base.en", "tiny.en", "small.en", "base", "tiny", "small"];

    #[cfg(all(feature = "whisper", feature = "model-download"))]
    fn require_any_model() -> Option<PathBuf> {
        for name in MODEL_CANDIDATES {
            let path = crate::models::model_path(name);
            if path.exists() {
                return Some(path);
            }
        }
        eprintln!();
        eprintln!("  ╔══════════════════════════════════════════════════════════════╗");
        eprintln!("  ║  WARNING: NO WHISPER MODEL FOUND, SKIPPING TEST             ║");
        eprintln!("  ║                                                              ║");
        eprintln!("  ║  Install any model to enable whisper tests:                  ║");
        eprintln!("  ║                                                              ║");
        eprintln!("  ║    cargo run -- models install base.en                       ║");
        eprintln!("  ║                                                              ║");
        eprintln!("  ╚══════════════════════════════════════════════════════════════╝");
        eprintln!();
        None
    }

    #[cfg(all(feature = "whisper", feature = "model-download"))]
    #[test]
    fn test_whisper_transcribe_silence_has_no_long_segments() {
        let Some(model_path) = require_any_model() else {
            return;
        };

        let transcriber = WhisperTranscriber::new(WhisperConfig {
            model_path,
            language: "en".to_string(),
            threads: Some(4),
        })
        .unwrap();

        let transcript = transcriber.transcribe(&vec![0i16; 16000 * 2]).unwrap();

        assert!((transcript.duration - 2.0).abs() < 1e-9);
        for segment in &transcript.segments {
            assert!(segment.end <= transcript.duration);
            assert!(segment.start < segment.end);
        }
    }

    #[test]
    fn test_whisper_transcriber_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<WhisperTranscriber>();
        assert_sync::<WhisperTranscriber>();
    }
}
