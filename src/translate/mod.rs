//! Text translation with bounded retry and rate-limit pacing.
//!
//! The translation service is an external collaborator behind the
//! [`Translator`] trait. [`TranslationRetrier`] wraps it with the per-segment
//! policy: skip trivial text, retry with a fresh client, fall back to the
//! source text instead of failing the segment.

pub mod google;
pub mod retrier;
pub mod translator;

pub use google::{GoogleTranslator, GoogleTranslatorFactory};
pub use retrier::{
    Pause, RecordingPause, RetryPolicy, ThreadSleep, TranslationOutcome, TranslationRetrier,
};
pub use translator::{MockTranslatorFactory, Translator, TranslatorFactory};
