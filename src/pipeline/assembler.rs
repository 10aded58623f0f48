use crate::audio::Track;
use crate::pipeline::types::TranslatedSegment;

/// Mixes duration-matched clips onto a silent bed of the source's length.
#[derive(Debug, Clone, Copy)]
pub struct TrackAssembler {
    sample_rate: u32,
}

impl TrackAssembler {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Build the full dubbed track.
    ///
    /// Clips are added at their segment's start in any order; overlaps mix by
    /// addition and anything past `total_duration` is cut off. The track's
    /// length depends only on `total_duration`.
    pub fn assemble(&self, segments: &[TranslatedSegment], total_duration: f64) -> Track {
        let mut track = Track::silent(total_duration, self.sample_rate);
        for translated in segments {
            track.overlay(&translated.clip, translated.segment.start);
        }
        track
    }
}
