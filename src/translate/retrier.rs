use crate::defaults;
use crate::error::{RedubError, Result};
use crate::translate::translator::{Translator, TranslatorFactory};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Something that can wait. Injected so tests don't sleep.
pub trait Pause: Send + Sync {
    fn pause(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingPause {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

/// Retry and pacing knobs for the translation loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per segment, including the first.
    pub max_attempts: u32,
    /// Wait before the first retry.
    pub retry_delay: Duration,
    /// Added to the wait for every further retry.
    pub retry_delay_step: Duration,
    /// Pause after every this many translated segments (0 disables pacing).
    pub rate_limit_every: u32,
    pub rate_limit_pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_TRANSLATION_ATTEMPTS,
            retry_delay: Duration::from_millis(defaults::RETRY_DELAY_MS),
            retry_delay_step: Duration::from_millis(defaults::RETRY_DELAY_STEP_MS),
            rate_limit_every: defaults::RATE_LIMIT_EVERY,
            rate_limit_pause: Duration::from_millis(defaults::RATE_LIMIT_PAUSE_MS),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based).
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        self.retry_delay + self.retry_delay_step * retry.saturating_sub(1)
    }
}

/// Result of translating one segment's text.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// Text too short to be worth dubbing; nothing should be synthesized.
    Skipped,
    Translated { text: String, attempts: u32 },
    /// Every attempt failed or echoed; carries the source text unchanged.
    Fallback {
        text: String,
        attempts: u32,
        last_error: String,
    },
}

impl TranslationOutcome {
    /// Text to synthesize, `None` for skipped segments.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Skipped => None,
            Self::Translated { text, .. } | Self::Fallback { text, .. } => Some(text),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Skipped => 0,
            Self::Translated { attempts, .. } | Self::Fallback { attempts, .. } => *attempts,
        }
    }
}

/// Wraps a translation client with the per-segment retry policy.
///
/// Holds one client across segments and replaces it before each retry.
/// Failures never escape: after the last attempt the source text comes back
/// as a [`TranslationOutcome::Fallback`].
pub struct TranslationRetrier {
    factory: Arc<dyn TranslatorFactory>,
    pause: Arc<dyn Pause>,
    policy: RetryPolicy,
    source: String,
    target: String,
    client: Option<Box<dyn Translator>>,
    processed: u32,
}

impl TranslationRetrier {
    pub fn new(factory: Arc<dyn TranslatorFactory>, source: &str, target: &str) -> Self {
        Self {
            factory,
            pause: Arc::new(ThreadSleep),
            policy: RetryPolicy::default(),
            source: source.to_string(),
            target: target.to_string(),
            client: None,
            processed: 0,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Segments that went through the retry loop (skips excluded).
    pub fn processed(&self) -> u32 {
        self.processed
    }

    /// Translate one segment's text.
    pub fn translate(&mut self, text: &str) -> TranslationOutcome {
        let trimmed = text.trim();
        if trimmed.chars().count() < defaults::MIN_TRANSLATABLE_CHARS {
            return TranslationOutcome::Skipped;
        }

        let outcome = self.translate_with_retries(trimmed);

        self.processed += 1;
        if self.policy.rate_limit_every > 0 && self.processed % self.policy.rate_limit_every == 0 {
            self.pause.pause(self.policy.rate_limit_pause);
        }

        outcome
    }

    fn translate_with_retries(&mut self, text: &str) -> TranslationOutcome {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                self.pause
                    .pause(self.policy.delay_before_retry(attempt - 1));
                self.client = None;
            }

            match self.attempt(text) {
                Ok(translated) => {
                    return TranslationOutcome::Translated {
                        text: translated,
                        attempts: attempt,
                    };
                }
                Err(e) => last_error = Some(e),
            }
        }

        TranslationOutcome::Fallback {
            text: text.to_string(),
            attempts: max_attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        }
    }

    fn attempt(&mut self, text: &str) -> Result<String> {
        let client = match self.client.take() {
            Some(client) => client,
            None => self.factory.create(&self.source, &self.target)?,
        };
        let reply = client.translate(text);
        self.client = Some(client);

        let reply = reply?;
        let translated = reply.trim();
        if translated.is_empty() {
            return Err(rejected("translation came back empty"));
        }
        if translated == text {
            return Err(rejected("translation echoed the input"));
        }
        Ok(translated.to_string())
    }
}

fn rejected(message: &str) -> RedubError {
    RedubError::Translation {
        message: message.to_string(),
    }
}
