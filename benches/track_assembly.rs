use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use redub::audio::AudioClip;
use redub::defaults::SAMPLE_RATE;
use redub::pipeline::{DurationMatcher, Segment, TrackAssembler, TranslatedSegment};
use std::hint::black_box;

/// A sawtooth clip, so time compression has something other than silence to crossfade.
fn speech_like_clip(seconds: f64) -> AudioClip {
    let len = (seconds * SAMPLE_RATE as f64).round() as usize;
    let samples = (0..len).map(|i| ((i % 200) as i16 - 100) * 80).collect();
    AudioClip::new(samples, SAMPLE_RATE)
}

/// `count` back-to-back three-second segments.
fn dubbed_segments(count: usize) -> Vec<TranslatedSegment> {
    (0..count)
        .map(|i| {
            let start = i as f64 * 3.0;
            TranslatedSegment {
                segment: Segment::new(i, start, start + 3.0, "narration"),
                translated_text: "narración".to_string(),
                fell_back: false,
                clip: speech_like_clip(3.0),
            }
        })
        .collect()
}

fn bench_duration_matching(c: &mut Criterion) {
    let matcher = DurationMatcher::default();
    let mut group = c.benchmark_group("duration_match");

    // Too long, in band, too short
    for (label, clip_secs) in [("compress", 5.0), ("in_band", 3.0), ("short", 2.0)] {
        let clip = speech_like_clip(clip_secs);
        group.bench_with_input(BenchmarkId::from_parameter(label), &clip, |b, clip| {
            b.iter(|| matcher.fit(black_box(clip), black_box(3.0)))
        });
    }
    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let assembler = TrackAssembler::new(SAMPLE_RATE);
    let mut group = c.benchmark_group("assemble");
    group.sample_size(20);

    for count in [10usize, 100, 400] {
        let segments = dubbed_segments(count);
        let total = count as f64 * 3.0;
        group.bench_with_input(BenchmarkId::from_parameter(count), &segments, |b, segments| {
            b.iter(|| assembler.assemble(black_box(segments), black_box(total)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_duration_matching, bench_assembly);
criterion_main!(benches);
