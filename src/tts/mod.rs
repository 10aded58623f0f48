//! Text-to-speech synthesis.
//!
//! A synthesizer turns translated text into a standalone clip of its own
//! natural duration; fitting it into a segment is the duration matcher's job.

pub mod google;

use crate::audio::AudioClip;
use crate::error::{RedubError, Result};
use std::sync::{Arc, Mutex, PoisonError};

pub use google::GoogleSynthesizer;

/// Trait for text-to-speech engines.
pub trait Synthesizer: Send + Sync {
    /// Speak `text` with the given voice variant (e.g., "fr", "pt-br").
    ///
    /// The returned clip is mono at the pipeline's canonical sample rate.
    fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip>;
}

impl<T: Synthesizer + ?Sized> Synthesizer for Arc<T> {
    fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip> {
        (**self).synthesize(text, voice)
    }
}

/// Mock synthesizer for testing.
///
/// Produces a constant-amplitude clip of a fixed duration so tests can find
/// the dubbed audio in the assembled track.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    sample_rate: u32,
    duration_secs: f64,
    amplitude: i16,
    fail_on: Option<String>,
    always_fail: bool,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockSynthesizer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            duration_secs: 1.0,
            amplitude: 8000,
            fail_on: None,
            always_fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Length of every synthesized clip.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn with_amplitude(mut self, amplitude: i16) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Fail whenever the text contains `needle`.
    pub fn with_failure_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.always_fail = true;
        self
    }

    /// `(text, voice)` pairs received, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Synthesizer for MockSynthesizer {
    fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((text.to_string(), voice.to_string()));

        let triggered = self
            .fail_on
            .as_deref()
            .is_some_and(|needle| text.contains(needle));
        if self.always_fail || triggered {
            return Err(RedubError::Synthesis {
                message: "mock synthesis failure".to_string(),
            });
        }

        let len = crate::audio::seconds_to_samples(self.duration_secs, self.sample_rate);
        Ok(AudioClip::new(vec![self.amplitude; len], self.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_produces_requested_duration() {
        let synth = MockSynthesizer::new(1000).with_duration(1.5);
        let clip = synth.synthesize("bonjour", "fr").unwrap();

        assert_eq!(clip.len(), 1500);
        assert_eq!(clip.sample_rate(), 1000);
        assert_eq!(clip.peak(), 8000);
        assert_eq!(synth.calls(), vec![("bonjour".to_string(), "fr".to_string())]);
    }

    #[test]
    fn test_mock_failure_on_text() {
        let synth = MockSynthesizer::new(1000).with_failure_on("boom");

        assert!(synth.synthesize("fine", "de").is_ok());
        assert!(matches!(
            synth.synthesize("boom goes", "de"),
            Err(RedubError::Synthesis { .. })
        ));
        assert_eq!(synth.calls().len(), 2);
    }

    #[test]
    fn test_synthesizer_is_object_safe() {
        let synth: Arc<dyn Synthesizer> = Arc::new(MockSynthesizer::new(8000).with_failure());
        assert!(synth.synthesize("hello", "en").is_err());
    }
}
