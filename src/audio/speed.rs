//! Pitch-neutral time compression.
//!
//! Speeds audio up by dropping short stretches at regular intervals and
//! crossfading across each cut. Playback rate of the remaining material is
//! untouched, so voices keep their pitch.

use crate::audio::clip::seconds_to_samples;

/// Length of each retained stretch when compressing by less than 2x.
const GRAIN_SECS: f64 = 0.150;

/// Crossfade applied across every cut.
const CROSSFADE_SECS: f64 = 0.025;

/// Compress `samples` so they play roughly `factor` times faster.
///
/// Factors at or below 1.0 (and non-finite factors) return the input unchanged.
pub fn time_compress(samples: &[i16], sample_rate: u32, factor: f64) -> Vec<i16> {
    if !factor.is_finite() || factor <= 1.0 || samples.is_empty() {
        return samples.to_vec();
    }

    let grain = seconds_to_samples(GRAIN_SECS, sample_rate).max(1);
    // keep / (keep + skip) == 1 / factor
    let (keep, skip) = if factor < 2.0 {
        (grain, (grain as f64 * (factor - 1.0)).round() as usize)
    } else {
        (
            (grain as f64 / (factor - 1.0)).round().max(1.0) as usize,
            grain,
        )
    };
    if skip == 0 {
        return samples.to_vec();
    }

    let fade = seconds_to_samples(CROSSFADE_SECS, sample_rate)
        .min(keep)
        .min(skip);
    let stride = keep + skip;

    let mut out = Vec::with_capacity((samples.len() as f64 / factor) as usize + keep + fade);
    let mut pos = 0;
    while pos < samples.len() {
        let end = (pos + keep + fade).min(samples.len());
        crossfade_append(&mut out, &samples[pos..end], fade);
        pos += stride;
    }
    out
}

/// Append `piece`, blending its head into the last `fade` samples of `out`.
fn crossfade_append(out: &mut Vec<i16>, piece: &[i16], fade: usize) {
    let overlap = fade.min(out.len()).min(piece.len());
    let base = out.len() - overlap;
    for (i, &incoming) in piece[..overlap].iter().enumerate() {
        let t = (i + 1) as f32 / (overlap + 1) as f32;
        let mixed = out[base + i] as f32 * (1.0 - t) + incoming as f32 * t;
        out[base + i] = mixed.round() as i16;
    }
    out.extend_from_slice(&piece[overlap..]);
}
