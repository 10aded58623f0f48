//! Summary of a finished dubbing run.

use crate::error::Result;
use crate::pipeline::types::TranslatedSegment;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One dubbed segment as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub source_text: String,
    pub translated_text: String,
    pub fell_back: bool,
}

impl From<&TranslatedSegment> for SegmentReport {
    fn from(translated: &TranslatedSegment) -> Self {
        Self {
            index: translated.segment.index,
            start: translated.segment.start,
            end: translated.segment.end,
            source_text: translated.segment.text.trim().to_string(),
            translated_text: translated.translated_text.clone(),
            fell_back: translated.fell_back,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DubReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub target_language: String,
    pub model: String,
    /// Duration of the source video in seconds.
    pub duration: f64,
    pub output_size_bytes: u64,
    /// Segments in the transcript.
    pub segments_total: usize,
    /// Segments with dubbed audio in the output.
    pub segments_dubbed: usize,
    /// Segments with too little text to dub.
    pub segments_skipped: usize,
    /// Segments dropped for timing or synthesis problems.
    pub segments_failed: usize,
    /// Dubbed segments that kept their source text.
    pub fallbacks: usize,
    pub segments: Vec<SegmentReport>,
    pub warnings: Vec<String>,
}

impl DubReport {
    /// First `count` dubbed segments.
    pub fn preview(&self, count: usize) -> &[SegmentReport] {
        &self.segments[..count.min(self.segments.len())]
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            crate::error::RedubError::Other(format!("Failed to serialize report: {e}"))
        })
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
