use crate::defaults;
use crate::error::{RedubError, Result};
use crate::pipeline::types::Transcript;
use std::sync::Arc;

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (real Whisper vs mock).
pub trait Transcriber: Send + Sync {
    /// Transcribe audio into timed segments.
    ///
    /// # Arguments
    /// * `audio` - Audio samples as 16-bit PCM at 16kHz mono
    ///
    /// # Returns
    /// Segments in temporal order plus the duration of `audio`
    fn transcribe(&self, audio: &[i16]) -> Result<Transcript>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;

    /// Check if the transcriber is ready
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> so one loaded model can back several runs.
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    fn transcribe(&self, audio: &[i16]) -> Result<Transcript> {
        (**self).transcribe(audio)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Duration in seconds of 16kHz audio.
pub fn audio_duration(audio: &[i16]) -> f64 {
    audio.len() as f64 / defaults::WHISPER_SAMPLE_RATE as f64
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    spans: Vec<(f64, f64, String)>,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber that finds no speech
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            spans: Vec::new(),
            should_fail: false,
        }
    }

    /// Add a segment to every transcript
    pub fn with_segment(mut self, start: f64, end: f64, text: &str) -> Self {
        self.spans.push((start, end, text.to_string()));
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, audio: &[i16]) -> Result<Transcript> {
        if self.should_fail {
            return Err(RedubError::TranscriptionInferenceFailed {
                message: "mock transcription failure".to_string(),
            });
        }

        let spans: Vec<(f64, f64, &str)> = self
            .spans
            .iter()
            .map(|(start, end, text)| (*start, *end, text.as_str()))
            .collect();
        Ok(Transcript::from_spans(&spans, audio_duration(audio)))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}
