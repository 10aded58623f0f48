//! Error types for redub.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedubError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unsupported target language '{code}'. Run 'redub languages' to see the supported codes")]
    UnsupportedLanguage { code: String },

    // Input / environment errors
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Unsupported container for {path}: only .mp4 input is supported")]
    UnsupportedContainer { path: String },

    #[error("Output {path} is the input video; choose a different --output")]
    OutputIsInput { path: String },

    #[error("Required tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("Environment not ready:\n{guidance}")]
    EnvironmentNotReady { guidance: String },

    // Media tool errors
    #[error("{tool} failed with status {status}: {stderr}")]
    MediaToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to probe media duration: {message}")]
    MediaProbe { message: String },

    // Audio buffer errors
    #[error("Audio format error: {message}")]
    AudioFormat { message: String },

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    // Transcription errors
    #[error("Transcription model not found at {path}")]
    TranscriptionModelNotFound { path: String },

    #[error("Transcription inference failed: {message}")]
    TranscriptionInferenceFailed { message: String },

    #[error("Transcription produced no speech segments")]
    NoSpeechSegments,

    // Per-segment collaborator errors
    #[error("Translation failed: {message}")]
    Translation { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // Stage-fatal errors
    #[error("No translated audio segments were generated")]
    NoTranslatedSegments,

    #[error("Failed to create the output video: {message}")]
    RemuxFailed { message: String },

    // Model management
    #[error("Model download failed: {message}")]
    ModelDownload { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, RedubError>;
