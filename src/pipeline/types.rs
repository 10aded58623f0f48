//! Data types flowing through the dubbing pipeline.

use crate::audio::AudioClip;
use serde::Serialize;

/// One interval of source speech with its transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Ordinal position in the transcript, unique.
    pub index: usize,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Source-language text; may be blank.
    pub text: String,
}

impl Segment {
    pub fn new(index: usize, start: f64, end: f64, text: &str) -> Self {
        Self {
            index,
            start,
            end,
            text: text.to_string(),
        }
    }

    /// Target duration of the dubbed clip, `end - start`.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Output of the speech-to-text stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    /// Segments in temporal order.
    pub segments: Vec<Segment>,
    /// Duration of the transcribed audio in seconds.
    pub duration: f64,
}

impl Transcript {
    /// Build a transcript from `(start, end, text)` triples, numbering them in order.
    pub fn from_spans(spans: &[(f64, f64, &str)], duration: f64) -> Self {
        let segments = spans
            .iter()
            .enumerate()
            .map(|(index, &(start, end, text))| Segment::new(index, start, end, text))
            .collect();
        Self { segments, duration }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Source audio cut to one segment's interval. Reference only downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSegment {
    pub segment: Segment,
    pub clip: AudioClip,
}

/// A segment with its translation and duration-matched speech.
///
/// Built once per dubbed segment and consumed by the track assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedSegment {
    pub segment: Segment,
    pub translated_text: String,
    /// True when translation gave up and `translated_text` is the source text.
    pub fell_back: bool,
    /// Speech clip lasting exactly `segment.duration()`.
    pub clip: AudioClip,
}

/// Stages of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Transcribing,
    Extracting,
    Translating,
    Assembling,
    Remuxing,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Transcribing => "transcribing",
            Self::Extracting => "extracting",
            Self::Translating => "translating",
            Self::Assembling => "assembling",
            Self::Remuxing => "remuxing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
