//! WAV decoding and encoding.
//!
//! Decoded audio is always folded down to mono and resampled to the requested
//! rate, so callers can treat every clip as living on the same timeline.

use crate::audio::clip::AudioClip;
use crate::error::{RedubError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decode WAV data from any reader into a mono clip at `target_rate`.
///
/// Accepts 16-bit integer and 32-bit float PCM with any channel count.
pub fn read_wav<R: Read>(reader: R, target_rate: u32) -> Result<AudioClip> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| RedubError::AudioFormat {
        message: format!("Failed to parse WAV data: {}", e),
    })?;

    let spec = wav_reader.spec();
    if spec.channels == 0 {
        return Err(RedubError::AudioFormat {
            message: "WAV header declares zero channels".to_string(),
        });
    }

    let raw_samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RedubError::AudioFormat {
                message: format!("Failed to read WAV samples: {}", e),
            })?,
        (hound::SampleFormat::Float, 32) => wav_reader
            .samples::<f32>()
            .map(|s| s.map(float_to_i16))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RedubError::AudioFormat {
                message: format!("Failed to read WAV samples: {}", e),
            })?,
        (format, bits) => {
            return Err(RedubError::AudioFormat {
                message: format!("Unsupported WAV encoding: {:?} {}-bit", format, bits),
            });
        }
    };

    let mono = downmix(&raw_samples, spec.channels);
    let samples = resample(&mono, spec.sample_rate, target_rate);

    Ok(AudioClip::new(samples, target_rate))
}

/// Decode a WAV file from disk into a mono clip at `target_rate`.
pub fn read_wav_file(path: &Path, target_rate: u32) -> Result<AudioClip> {
    let file = File::open(path)?;
    read_wav(BufReader::new(file), target_rate)
}

/// Write a clip as a 16-bit mono WAV file.
pub fn write_wav_file(clip: &AudioClip, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in clip.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

fn float_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Average interleaved frames down to a single channel.
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = (source_pos.floor() as usize).min(samples.len() - 1);
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
