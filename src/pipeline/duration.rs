//! Fit synthesized speech into its source interval.
//!
//! Speech that runs long is time-compressed to the target; speech that runs
//! short only gets a capped speed-up. Slowing down is never applied. The
//! result is then trimmed or padded with silence to the exact target length.

use crate::audio::{AudioClip, seconds_to_samples};
use crate::defaults;

/// Speed-up thresholds, as ratios of clip duration to target duration.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationMatcher {
    /// Above this ratio the clip is compressed to the target.
    pub long_ratio: f64,
    /// Below this ratio the clip gets the capped speed-up.
    pub short_ratio: f64,
    pub short_max_speedup: f64,
}

impl Default for DurationMatcher {
    fn default() -> Self {
        Self {
            long_ratio: defaults::LONG_CLIP_RATIO,
            short_ratio: defaults::SHORT_CLIP_RATIO,
            short_max_speedup: defaults::SHORT_CLIP_MAX_SPEEDUP,
        }
    }
}

impl DurationMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed-up factor for a clip of `current` seconds aimed at `target` seconds.
    ///
    /// Returns 1.0 when the clip is left at its natural speed.
    pub fn speed_factor(&self, current: f64, target: f64) -> f64 {
        if current <= 0.0 || target <= 0.0 || !current.is_finite() || !target.is_finite() {
            return 1.0;
        }
        let ratio = current / target;
        if ratio > self.long_ratio {
            ratio
        } else if ratio < self.short_ratio {
            (1.0 / ratio).min(self.short_max_speedup)
        } else {
            1.0
        }
    }

    /// Return a copy of `clip` lasting exactly `target_secs`.
    pub fn fit(&self, clip: &AudioClip, target_secs: f64) -> AudioClip {
        let target_len = seconds_to_samples(target_secs, clip.sample_rate());
        let factor = self.speed_factor(clip.duration_secs(), target_secs);

        let adjusted = if factor > 1.0 {
            clip.sped_up(factor)
        } else {
            clip.clone()
        };
        adjusted.fitted(target_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;

    fn tone(seconds: f64) -> AudioClip {
        let len = seconds_to_samples(seconds, RATE);
        let samples = (0..len)
            .map(|i| {
                let t = i as f64 / RATE as f64;
                ((t * 220.0 * std::f64::consts::TAU).sin() * 8000.0) as i16
            })
            .collect();
        AudioClip::new(samples, RATE)
    }

    /// Index one past the last non-zero sample.
    fn content_end(clip: &AudioClip) -> usize {
        clip.samples()
            .iter()
            .rposition(|&s| s != 0)
            .map_or(0, |i| i + 1)
    }

    #[test]
    fn test_speed_factor_bands() {
        let matcher = DurationMatcher::new();

        assert!((matcher.speed_factor(5.0, 3.0) - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(matcher.speed_factor(1.0, 2.0), 1.3);
        assert!((matcher.speed_factor(0.79, 1.0) - 1.0 / 0.79).abs() < 1e-12);
        assert_eq!(matcher.speed_factor(2.0, 2.1), 1.0);
        assert_eq!(matcher.speed_factor(1.2, 1.0), 1.0);
        assert_eq!(matcher.speed_factor(0.8, 1.0), 1.0);
    }

    #[test]
    fn test_speed_factor_never_slows_down() {
        let matcher = DurationMatcher::new();
        for current in [0.1, 0.5, 0.79, 1.0, 1.5, 4.0] {
            assert!(matcher.speed_factor(current, 1.0) >= 1.0);
        }
    }

    #[test]
    fn test_long_clip_is_compressed_then_trimmed() {
        let matcher = DurationMatcher::new();
        let clip = tone(5.0);

        let fitted = matcher.fit(&clip, 3.0);

        assert_eq!(fitted.len(), 3 * RATE as usize);
        // Compression did the bulk of the work; no large chunk was cut off.
        assert!(content_end(&fitted) > (2.8 * RATE as f64) as usize);
    }

    #[test]
    fn test_short_clip_is_capped_then_padded() {
        let matcher = DurationMatcher::new();
        let clip = tone(1.0);

        let fitted = matcher.fit(&clip, 2.0);

        assert_eq!(fitted.len(), 2 * RATE as usize);
        let speech_secs = content_end(&fitted) as f64 / RATE as f64;
        assert!(
            (speech_secs - 1.0 / 1.3).abs() < 0.05,
            "expected ~0.77s of speech, got {speech_secs}"
        );
        assert!(fitted.samples()[content_end(&fitted)..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_near_target_clip_is_only_padded() {
        let matcher = DurationMatcher::new();
        let clip = tone(2.0);

        let fitted = matcher.fit(&clip, 2.1);

        assert_eq!(fitted.len(), seconds_to_samples(2.1, RATE));
        assert_eq!(&fitted.samples()[..clip.len()], clip.samples());
        assert!(fitted.samples()[clip.len()..].iter().all(|&s| s == 0));
        assert_eq!(fitted.len() - clip.len(), (0.1 * RATE as f64).round() as usize);
    }

    #[test]
    fn test_slightly_long_clip_is_trimmed_without_speed_change() {
        let matcher = DurationMatcher::new();
        let clip = tone(2.2);

        let fitted = matcher.fit(&clip, 2.0);

        assert_eq!(fitted.len(), 2 * RATE as usize);
        assert_eq!(fitted.samples(), &clip.samples()[..fitted.len()]);
    }

    #[test]
    fn test_empty_clip_becomes_silence() {
        let matcher = DurationMatcher::new();
        let fitted = matcher.fit(&AudioClip::new(Vec::new(), RATE), 1.5);

        assert_eq!(fitted.len(), seconds_to_samples(1.5, RATE));
        assert_eq!(fitted.peak(), 0);
    }

    #[test]
    fn test_input_clip_is_untouched() {
        let matcher = DurationMatcher::new();
        let clip = tone(5.0);
        let before = clip.clone();

        matcher.fit(&clip, 3.0);

        assert_eq!(clip, before);
    }
}
