use crate::audio::clip::{AudioClip, seconds_to_samples};

/// Full-length output buffer that clips are mixed into.
///
/// The length is fixed at construction; overlays only ever add into the
/// existing samples and anything past the end is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl Track {
    /// A silent track lasting `duration_secs`.
    pub fn silent(duration_secs: f64, sample_rate: u32) -> Self {
        Self {
            samples: vec![0; seconds_to_samples(duration_secs, sample_rate)],
            sample_rate,
        }
    }

    /// Additively mix `clip` in starting at `offset_secs`.
    ///
    /// Returns the number of samples written, which is smaller than the clip
    /// when it runs past the end of the track.
    pub fn overlay(&mut self, clip: &AudioClip, offset_secs: f64) -> usize {
        let offset = seconds_to_samples(offset_secs, self.sample_rate);
        if offset >= self.samples.len() {
            return 0;
        }
        let room = self.samples.len() - offset;
        let written = clip.len().min(room);
        for (dst, &src) in self.samples[offset..offset + written]
            .iter_mut()
            .zip(clip.samples())
        {
            *dst = dst.saturating_add(src);
        }
        written
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Hand the finished buffer over as a clip, e.g. for writing to disk.
    pub fn into_clip(self) -> AudioClip {
        AudioClip::new(self.samples, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 100;

    #[test]
    fn silent_track_has_requested_length() {
        let track = Track::silent(12.0, RATE);
        assert_eq!(track.len(), 1200);
        assert!(track.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn overlay_adds_into_existing_samples() {
        let mut track = Track::silent(1.0, RATE);
        let clip = AudioClip::new(vec![10; 20], RATE);

        track.overlay(&clip, 0.5);
        track.overlay(&clip, 0.6);

        assert_eq!(track.samples()[49], 0);
        assert_eq!(track.samples()[50], 10);
        assert_eq!(track.samples()[60], 20);
        assert_eq!(track.samples()[69], 20);
        assert_eq!(track.samples()[70], 10);
        assert_eq!(track.samples()[80], 0);
    }

    #[test]
    fn overlay_truncates_at_track_end() {
        let mut track = Track::silent(1.0, RATE);
        let clip = AudioClip::new(vec![7; 50], RATE);

        let written = track.overlay(&clip, 0.8);

        assert_eq!(written, 20);
        assert_eq!(track.len(), 100);
        assert_eq!(track.samples()[99], 7);
    }

    #[test]
    fn overlay_past_end_is_ignored() {
        let mut track = Track::silent(1.0, RATE);
        let clip = AudioClip::new(vec![7; 5], RATE);

        assert_eq!(track.overlay(&clip, 1.0), 0);
        assert_eq!(track.overlay(&clip, 42.0), 0);
        assert!(track.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn overlay_saturates_instead_of_wrapping() {
        let mut track = Track::silent(0.1, RATE);
        let loud = AudioClip::new(vec![30000; 10], RATE);
        let quiet_neg = AudioClip::new(vec![-30000; 10], RATE);

        track.overlay(&loud, 0.0);
        track.overlay(&loud, 0.0);
        assert!(track.samples().iter().all(|&s| s == i16::MAX));

        let mut track = Track::silent(0.1, RATE);
        track.overlay(&quiet_neg, 0.0);
        track.overlay(&quiet_neg, 0.0);
        assert!(track.samples().iter().all(|&s| s == i16::MIN));
    }

    #[test]
    fn into_clip_keeps_samples_and_rate() {
        let mut track = Track::silent(0.05, RATE);
        track.overlay(&AudioClip::new(vec![1, 2], RATE), 0.0);

        let clip = track.into_clip();

        assert_eq!(clip.samples(), &[1, 2, 0, 0, 0]);
        assert_eq!(clip.sample_rate(), RATE);
    }
}
