//! redub - Re-dub English-narrated videos into another spoken language
//!
//! Transcribes the source audio, translates each segment, synthesizes and
//! time-fits the translated speech, and remuxes it under the original video.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
#[cfg(all(feature = "cli", feature = "model-download"))]
pub mod diagnostics;
pub mod error;
pub mod languages;
pub mod media;
#[cfg(feature = "model-download")]
pub mod models;
#[cfg(feature = "cli")]
pub mod output;
pub mod pipeline;
pub mod stt;
pub mod translate;
pub mod tts;

// Composition root - needs everything
#[cfg(all(feature = "cli", feature = "model-download"))]
pub mod app;

// Core traits (collaborator seams)
pub use media::{CommandExecutor, MediaTool, SystemCommandExecutor};
pub use stt::transcriber::Transcriber;
pub use translate::{Translator, TranslatorFactory};
pub use tts::Synthesizer;

// Pipeline
pub use pipeline::{DubReport, Pipeline, PipelineConfig, PipelineStage};

// Error handling
pub use error::{RedubError, Result};

// Config
pub use config::Config;

// Progress reporting
pub use pipeline::{ProgressReporter, SegmentError};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_appends_git_hash_when_present() {
        let ver = version_string();
        match option_env!("GIT_HASH") {
            Some(hash) if !hash.is_empty() => {
                assert_eq!(ver, format!("{}+{}", env!("CARGO_PKG_VERSION"), hash));
            }
            _ => assert_eq!(ver, env!("CARGO_PKG_VERSION")),
        }
    }
}
