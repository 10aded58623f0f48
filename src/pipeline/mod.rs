//! Dubbing pipeline.
//!
//! Stages run one after another on the calling thread:
//! transcribe → extract segments → translate + synthesize + fit → assemble → remux.

pub mod assembler;
pub mod duration;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod remuxer;
pub mod report;
pub mod types;

pub use assembler::TrackAssembler;
pub use duration::DurationMatcher;
pub use error::{LogReporter, NullReporter, ProgressReporter, SegmentError};
pub use extractor::{DroppedSegment, Extraction, SegmentExtractor};
pub use orchestrator::{
    Pipeline, PipelineConfig, ensure_distinct_output, output_path_for, validate_input,
};
pub use remuxer::Remuxer;
pub use report::{DubReport, SegmentReport};
pub use types::{ExtractedSegment, PipelineStage, Segment, TranslatedSegment, Transcript};
