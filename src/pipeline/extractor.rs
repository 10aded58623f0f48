use crate::audio::AudioClip;
use crate::pipeline::types::{ExtractedSegment, Segment};

/// A segment that could not be cut from the source audio.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedSegment {
    pub segment: Segment,
    pub reason: String,
}

/// Result of slicing the source audio.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Segments inside the source, in input order, with `end` clamped.
    pub segments: Vec<ExtractedSegment>,
    pub dropped: Vec<DroppedSegment>,
}

/// Slices the full source audio into one clip per transcript segment.
///
/// Segments that start outside the audio, or whose interval is empty or not
/// finite, are dropped rather than failing the run. An `end` past the audio
/// is clamped to its length.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentExtractor;

impl SegmentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, source: &AudioClip, segments: &[Segment]) -> Extraction {
        let source_len = source.duration_secs();
        let mut extraction = Extraction::default();

        for segment in segments {
            if let Some(reason) = out_of_bounds(segment, source_len) {
                extraction.dropped.push(DroppedSegment {
                    segment: segment.clone(),
                    reason,
                });
                continue;
            }

            let mut clamped = segment.clone();
            clamped.end = segment.end.min(source_len);
            let clip = source.slice_secs(clamped.start, clamped.end);
            extraction.segments.push(ExtractedSegment {
                segment: clamped,
                clip,
            });
        }

        extraction
    }
}

fn out_of_bounds(segment: &Segment, source_len: f64) -> Option<String> {
    if !segment.start.is_finite() || !segment.end.is_finite() {
        return Some("timestamps are not finite".to_string());
    }
    if segment.start < 0.0 {
        return Some(format!("starts before the audio ({:.2}s)", segment.start));
    }
    if segment.start >= source_len {
        return Some(format!(
            "starts at {:.2}s, after the audio ends at {:.2}s",
            segment.start, source_len
        ));
    }
    if segment.end <= segment.start {
        return Some(format!(
            "empty interval [{:.2}s, {:.2}s)",
            segment.start, segment.end
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 100;

    /// Ramp so every sample identifies its own position.
    fn ramp(seconds: usize) -> AudioClip {
        AudioClip::new((0..(seconds * RATE as usize) as i16).collect(), RATE)
    }

    #[test]
    fn test_extracts_each_interval() {
        let source = ramp(10);
        let segments = vec![
            Segment::new(0, 1.0, 2.0, "one"),
            Segment::new(1, 4.5, 5.0, "two"),
        ];

        let extraction = SegmentExtractor::new().extract(&source, &segments);

        assert!(extraction.dropped.is_empty());
        assert_eq!(extraction.segments.len(), 2);
        let first = &extraction.segments[0].clip;
        assert_eq!(first.len(), 100);
        assert_eq!(first.samples()[0], 100);
        assert_eq!(first.samples()[99], 199);
        assert_eq!(extraction.segments[1].clip.len(), 50);
        assert_eq!(extraction.segments[1].segment.text, "two");
    }

    #[test]
    fn test_end_is_clamped_to_source() {
        let source = ramp(10);
        let segments = vec![Segment::new(0, 9.0, 12.0, "tail")];

        let extraction = SegmentExtractor::new().extract(&source, &segments);

        assert_eq!(extraction.segments.len(), 1);
        assert_eq!(extraction.segments[0].segment.end, 10.0);
        assert_eq!(extraction.segments[0].clip.len(), 100);
    }

    #[test]
    fn test_out_of_bounds_segments_are_dropped() {
        let source = ramp(10);
        let segments = vec![
            Segment::new(0, 11.0, 12.0, "after"),
            Segment::new(1, -1.0, 1.0, "before"),
            Segment::new(2, 3.0, 3.0, "empty"),
            Segment::new(3, f64::NAN, 1.0, "nan"),
            Segment::new(4, 2.0, 3.0, "kept"),
        ];

        let extraction = SegmentExtractor::new().extract(&source, &segments);

        assert_eq!(extraction.dropped.len(), 4);
        assert_eq!(extraction.segments.len(), 1);
        assert_eq!(extraction.segments[0].segment.index, 4);
        assert!(extraction.dropped[0].reason.contains("after the audio"));
    }

    #[test]
    fn test_source_is_not_mutated() {
        let source = ramp(2);
        let before = source.clone();

        SegmentExtractor::new().extract(&source, &[Segment::new(0, 0.0, 1.0, "x")]);

        assert_eq!(source, before);
    }
}
