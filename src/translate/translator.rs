use crate::error::{RedubError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Trait for a translation client bound to one language pair.
pub trait Translator: Send {
    /// Translate `text` into the client's target language.
    fn translate(&self, text: &str) -> Result<String>;
}

/// Builds translation clients.
///
/// The retrier asks for a fresh client before every retry, so a client that
/// got into a bad state (throttled session, stale connection) is dropped.
pub trait TranslatorFactory: Send + Sync {
    fn create(&self, source: &str, target: &str) -> Result<Box<dyn Translator>>;
}

impl<T: TranslatorFactory + ?Sized> TranslatorFactory for Arc<T> {
    fn create(&self, source: &str, target: &str) -> Result<Box<dyn Translator>> {
        (**self).create(source, target)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum MockReply {
    Text(String),
    Echo,
    Fail(String),
    Tagged,
}

#[derive(Debug)]
struct MockState {
    script: Mutex<VecDeque<MockReply>>,
    default_reply: MockReply,
    calls: Mutex<Vec<String>>,
    created: AtomicUsize,
}

/// Mock translator factory for testing.
///
/// Replies are scripted in order and shared by every client the factory
/// creates. Once the script runs out, clients tag the text with the target
/// code (`"[fr] hello"`), echo it, or fail, depending on the builder used.
#[derive(Debug, Clone)]
pub struct MockTranslatorFactory {
    state: Arc<MockState>,
}

impl MockTranslatorFactory {
    pub fn new() -> Self {
        Self::with_default(MockReply::Tagged)
    }

    /// Every call fails.
    pub fn always_failing() -> Self {
        Self::with_default(MockReply::Fail("mock translation failure".to_string()))
    }

    /// Every call returns its input unchanged.
    pub fn always_echoing() -> Self {
        Self::with_default(MockReply::Echo)
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            state: Arc::new(MockState {
                script: Mutex::new(VecDeque::new()),
                default_reply,
                calls: Mutex::new(Vec::new()),
                created: AtomicUsize::new(0),
            }),
        }
    }

    fn push(self, reply: MockReply) -> Self {
        self.state
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Queue a successful translation.
    pub fn with_reply(self, text: &str) -> Self {
        self.push(MockReply::Text(text.to_string()))
    }

    /// Queue a reply identical to the input.
    pub fn with_echo(self) -> Self {
        self.push(MockReply::Echo)
    }

    /// Queue a failed call.
    pub fn with_failure(self, message: &str) -> Self {
        self.push(MockReply::Fail(message.to_string()))
    }

    /// Texts passed to `translate`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of clients handed out so far.
    pub fn created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }
}

impl Default for MockTranslatorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslatorFactory for MockTranslatorFactory {
    fn create(&self, _source: &str, target: &str) -> Result<Box<dyn Translator>> {
        self.state.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockTranslator {
            state: Arc::clone(&self.state),
            target: target.to_string(),
        }))
    }
}

struct MockTranslator {
    state: Arc<MockState>,
    target: String,
}

impl Translator for MockTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());

        let reply = self
            .state
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.state.default_reply.clone());

        match reply {
            MockReply::Text(t) => Ok(t),
            MockReply::Echo => Ok(text.to_string()),
            MockReply::Fail(message) => Err(RedubError::Translation { message }),
            MockReply::Tagged => Ok(format!("[{}] {}", self.target, text)),
        }
    }
}
