//! Dubbing pipeline: transcribe → extract → translate → assemble → remux.
//!
//! Each stage runs to completion before the next starts. Per-segment
//! problems are reported and turned into skips; only stage-fatal errors end
//! the run. Intermediate files live in a temporary directory that is removed
//! when the run finishes, successfully or not.

use crate::audio::{AudioClip, wav};
use crate::defaults;
use crate::error::{RedubError, Result};
use crate::languages::Language;
use crate::media::MediaTool;
use crate::pipeline::assembler::TrackAssembler;
use crate::pipeline::duration::DurationMatcher;
use crate::pipeline::error::{LogReporter, ProgressReporter, SegmentError};
use crate::pipeline::extractor::SegmentExtractor;
use crate::pipeline::remuxer::Remuxer;
use crate::pipeline::report::{DubReport, SegmentReport};
use crate::pipeline::types::{ExtractedSegment, PipelineStage, TranslatedSegment};
use crate::stt::transcriber::Transcriber;
use crate::translate::retrier::{
    Pause, RetryPolicy, ThreadSleep, TranslationOutcome, TranslationRetrier,
};
use crate::translate::translator::TranslatorFactory;
use crate::tts::Synthesizer;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the extracted source audio inside the working directory.
const SOURCE_AUDIO_FILE: &str = "source_audio.wav";

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Spoken language of the input video
    pub source_language: String,
    /// Dubbing target
    pub target: &'static Language,
    /// Sample rate of every clip and of the output track
    pub sample_rate: u32,
    pub retry: RetryPolicy,
    pub matcher: DurationMatcher,
    /// Directory for the derived output name (default: next to the input)
    pub output_dir: Option<PathBuf>,
    /// Exact output path, overriding the derived name
    pub output: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(target: &'static Language) -> Self {
        Self {
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target,
            sample_rate: defaults::SAMPLE_RATE,
            retry: RetryPolicy::default(),
            matcher: DurationMatcher::default(),
            output_dir: None,
            output: None,
        }
    }
}

/// Check that `input` is an existing `.mp4` file.
pub fn validate_input(input: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(RedubError::InputNotFound {
            path: input.display().to_string(),
        });
    }
    let is_mp4 = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"));
    if !is_mp4 {
        return Err(RedubError::UnsupportedContainer {
            path: input.display().to_string(),
        });
    }
    Ok(())
}

/// Reject an `output` that resolves to the same file as `input`.
///
/// `output` may not exist yet, so its parent is resolved instead and the
/// file name joined back on.
pub fn ensure_distinct_output(input: &Path, output: &Path) -> Result<()> {
    let input = input.canonicalize()?;
    let resolved = match output.canonicalize() {
        Ok(path) => Some(path),
        Err(_) => match (output.parent(), output.file_name()) {
            (Some(parent), Some(name)) => {
                let parent = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
                parent.canonicalize().ok().map(|p| p.join(name))
            }
            _ => None,
        },
    };
    if resolved.is_some_and(|path| path == input) {
        return Err(RedubError::OutputIsInput {
            path: output.display().to_string(),
        });
    }
    Ok(())
}

/// `{base}_{code}_audio.mp4` in `dir`, or next to the input.
pub fn output_path_for(input: &Path, language: &Language, dir: Option<&Path>) -> PathBuf {
    let base = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let name = format!("{}_{}_audio.mp4", base, language.file_suffix());
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    dir.join(name)
}

/// Counters gathered during the translate stage.
#[derive(Debug, Default)]
struct TranslateStats {
    skipped: usize,
    failed: usize,
    fallbacks: usize,
}

/// The dubbing pipeline with its injected collaborators.
pub struct Pipeline {
    config: PipelineConfig,
    transcriber: Arc<dyn Transcriber>,
    translators: Arc<dyn TranslatorFactory>,
    synthesizer: Arc<dyn Synthesizer>,
    media: Arc<dyn MediaTool>,
    reporter: Arc<dyn ProgressReporter>,
    pause: Arc<dyn Pause>,
    stage: PipelineStage,
    warnings: Vec<String>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        transcriber: Arc<dyn Transcriber>,
        translators: Arc<dyn TranslatorFactory>,
        synthesizer: Arc<dyn Synthesizer>,
        media: Arc<dyn MediaTool>,
    ) -> Self {
        Self {
            config,
            transcriber,
            translators,
            synthesizer,
            media,
            reporter: Arc::new(LogReporter),
            pause: Arc::new(ThreadSleep),
            stage: PipelineStage::Idle,
            warnings: Vec::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the sleeper used for retry back-off and rate limiting.
    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Where the dubbed video for `input` will be written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match &self.config.output {
            Some(path) => path.clone(),
            None => output_path_for(input, self.config.target, self.config.output_dir.as_deref()),
        }
    }

    /// Dub `input` and return a summary of the run.
    pub fn run(&mut self, input: &Path) -> Result<DubReport> {
        self.warnings.clear();
        self.enter(PipelineStage::Idle);

        match self.run_stages(input) {
            Ok(report) => {
                self.enter(PipelineStage::Done);
                Ok(report)
            }
            Err(e) => {
                self.enter(PipelineStage::Failed);
                self.reporter
                    .report(PipelineStage::Failed, &SegmentError::Fatal(e.to_string()));
                Err(e)
            }
        }
    }

    fn enter(&mut self, stage: PipelineStage) {
        self.stage = stage;
        self.reporter.stage_changed(stage);
    }

    fn warn(&mut self, error: SegmentError) {
        self.reporter.report(self.stage, &error);
        self.warnings.push(error.to_string());
    }

    fn run_stages(&mut self, input: &Path) -> Result<DubReport> {
        validate_input(input)?;
        let output = self.output_path(input);
        ensure_distinct_output(input, &output)?;

        // Removed on drop, on every return path.
        let work_dir = tempfile::Builder::new().prefix("redub-").tempdir()?;

        self.enter(PipelineStage::Transcribing);
        let source_path = work_dir.path().join(SOURCE_AUDIO_FILE);
        self.media
            .extract_audio(input, &source_path, self.config.sample_rate)?;
        let source = AudioClip::from_wav_file(&source_path, self.config.sample_rate)?;
        let duration = self.media.probe_duration(input)?;

        let whisper_audio = wav::resample(
            source.samples(),
            self.config.sample_rate,
            defaults::WHISPER_SAMPLE_RATE,
        );
        let transcript = self.transcriber.transcribe(&whisper_audio)?;
        if transcript.is_empty() {
            return Err(RedubError::NoSpeechSegments);
        }

        self.enter(PipelineStage::Extracting);
        let extraction = SegmentExtractor::new().extract(&source, &transcript.segments);
        for dropped in &extraction.dropped {
            self.warn(SegmentError::recoverable(
                dropped.segment.index,
                format!("dropped, {}", dropped.reason),
            ));
        }

        self.enter(PipelineStage::Translating);
        let mut stats = TranslateStats {
            failed: extraction.dropped.len(),
            ..TranslateStats::default()
        };
        let translated = self.translate_segments(&extraction.segments, &mut stats);
        if translated.is_empty() {
            return Err(RedubError::NoTranslatedSegments);
        }

        self.enter(PipelineStage::Assembling);
        let track = TrackAssembler::new(self.config.sample_rate).assemble(&translated, duration);

        self.enter(PipelineStage::Remuxing);
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Remuxer::new(Arc::clone(&self.media)).remux(input, track, work_dir.path(), &output)?;

        let output_size_bytes = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
        Ok(DubReport {
            input: input.to_path_buf(),
            output,
            target_language: self.config.target.code.to_string(),
            model: self.transcriber.model_name().to_string(),
            duration,
            output_size_bytes,
            segments_total: transcript.segments.len(),
            segments_dubbed: translated.len(),
            segments_skipped: stats.skipped,
            segments_failed: stats.failed,
            fallbacks: stats.fallbacks,
            segments: translated.iter().map(SegmentReport::from).collect(),
            warnings: self.warnings.clone(),
        })
    }

    fn translate_segments(
        &mut self,
        extracted: &[ExtractedSegment],
        stats: &mut TranslateStats,
    ) -> Vec<TranslatedSegment> {
        let mut retrier = TranslationRetrier::new(
            Arc::clone(&self.translators),
            &self.config.source_language,
            self.config.target.translation_code,
        )
        .with_policy(self.config.retry.clone())
        .with_pause(Arc::clone(&self.pause));

        let total = extracted.len();
        let mut translated = Vec::new();

        for (done, item) in extracted.iter().enumerate() {
            let segment = &item.segment;
            let outcome = retrier.translate(&segment.text);

            if let Some(text) = outcome.text() {
                if let TranslationOutcome::Fallback { last_error, .. } = &outcome {
                    stats.fallbacks += 1;
                    self.warn(SegmentError::recoverable(
                        segment.index,
                        format!("translation failed, keeping source text ({last_error})"),
                    ));
                }

                match self
                    .synthesizer
                    .synthesize(text, self.config.target.synthesis_variant)
                {
                    Ok(speech) => {
                        let speech = self.to_pipeline_rate(speech);
                        let clip = self.config.matcher.fit(&speech, segment.duration());
                        translated.push(TranslatedSegment {
                            segment: segment.clone(),
                            translated_text: text.to_string(),
                            fell_back: outcome.is_fallback(),
                            clip,
                        });
                    }
                    Err(e) => {
                        stats.failed += 1;
                        self.warn(SegmentError::recoverable(
                            segment.index,
                            format!("failed to generate audio: {e}"),
                        ));
                    }
                }
            } else {
                stats.skipped += 1;
            }

            self.reporter.segment_done(done + 1, total);
        }

        translated
    }

    fn to_pipeline_rate(&self, clip: AudioClip) -> AudioClip {
        if clip.sample_rate() == self.config.sample_rate {
            return clip;
        }
        let samples = wav::resample(clip.samples(), clip.sample_rate(), self.config.sample_rate);
        AudioClip::new(samples, self.config.sample_rate)
    }
}
