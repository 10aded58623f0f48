//! Default configuration constants for redub.
//!
//! Shared constants used by the pipeline stages and the configuration types.

/// Canonical sample rate of every clip flowing through the pipeline, in Hz.
///
/// Source audio is extracted at this rate and synthesized speech is decoded to it,
/// so all clips and the assembled track share one timeline resolution.
pub const SAMPLE_RATE: u32 = 22050;

/// Sample rate Whisper expects for inference.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Default Whisper model name.
pub const DEFAULT_MODEL: &str = "base";

/// Language spoken in the source video.
pub const SOURCE_LANGUAGE: &str = "en";

/// Target language used when nothing else is configured.
pub const TARGET_LANGUAGE: &str = "zh-CN";

/// Segments whose trimmed text has fewer characters than this are not dubbed.
pub const MIN_TRANSLATABLE_CHARS: usize = 2;

/// Translation attempts per segment before falling back to the source text.
pub const MAX_TRANSLATION_ATTEMPTS: u32 = 3;

/// Delay before the first translation retry, in milliseconds.
pub const RETRY_DELAY_MS: u64 = 2000;

/// Extra delay added for every further retry, in milliseconds.
pub const RETRY_DELAY_STEP_MS: u64 = 1000;

/// Pause after every this many translated segments.
pub const RATE_LIMIT_EVERY: u32 = 3;

/// Length of the rate-limit pause, in milliseconds.
pub const RATE_LIMIT_PAUSE_MS: u64 = 1000;

/// Clips longer than `target * LONG_CLIP_RATIO` are time-compressed to fit.
pub const LONG_CLIP_RATIO: f64 = 1.2;

/// Clips shorter than `target * SHORT_CLIP_RATIO` get a capped speed-up.
pub const SHORT_CLIP_RATIO: f64 = 0.8;

/// Maximum speed-up applied to clips that are already too short.
pub const SHORT_CLIP_MAX_SPEEDUP: f64 = 1.3;

/// HTTP timeout for translation and synthesis requests, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Suffix for English-only model variants.
pub const ENGLISH_ONLY_SUFFIX: &str = ".en";

/// Report the GPU backend compiled into this build.
///
/// Only one GPU backend can be active at a time; if none is enabled, returns "CPU".
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA"
    } else if cfg!(feature = "vulkan") {
        "Vulkan"
    } else if cfg!(feature = "hipblas") {
        "HipBLAS (AMD)"
    } else if cfg!(feature = "openblas") {
        "OpenBLAS"
    } else {
        "CPU"
    }
}
