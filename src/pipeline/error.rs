//! Per-segment errors and progress reporting for the dubbing pipeline.

use crate::pipeline::types::PipelineStage;
use std::fmt;

/// Problems that occur while a run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// One segment was skipped or degraded; the run continues.
    Recoverable { index: usize, message: String },
    /// The run is aborting.
    Fatal(String),
}

impl SegmentError {
    pub fn recoverable(index: usize, message: impl Into<String>) -> Self {
        Self::Recoverable {
            index,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::Recoverable { index, message } => {
                write!(f, "Segment {}: {}", index + 1, message)
            }
            SegmentError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for SegmentError {}

/// Observer for pipeline progress.
///
/// Called synchronously between steps, so implementations must be quick.
pub trait ProgressReporter: Send + Sync {
    /// The pipeline entered `stage`.
    fn stage_changed(&self, stage: PipelineStage);

    /// `done` of `total` segments have been through translation and synthesis.
    fn segment_done(&self, done: usize, total: usize) {
        let _ = (done, total);
    }

    /// Reports a problem encountered in `stage`.
    fn report(&self, stage: PipelineStage, error: &SegmentError);
}

/// Plain stderr reporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn stage_changed(&self, stage: PipelineStage) {
        eprintln!("redub: {}", stage);
    }

    fn report(&self, stage: PipelineStage, error: &SegmentError) {
        eprintln!("[{}] {}", stage, error);
    }
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn stage_changed(&self, _stage: PipelineStage) {}

    fn report(&self, _stage: PipelineStage, _error: &SegmentError) {}
}
