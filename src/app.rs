//! Dubbing application entry point.
//!
//! Composition root for `redub dub`: resolves configuration, checks the
//! environment, wires the concrete collaborators into a [`Pipeline`] and
//! renders the result.

use crate::cli::DubArgs;
use crate::config::Config;
use crate::diagnostics::check_environment;
use crate::error::Result;
use crate::languages::resolve_language;
use crate::media::{FfmpegTool, MediaTool, SystemCommandExecutor};
use crate::models::download::ensure_model;
use crate::output::{TerminalReporter, print_summary};
use crate::pipeline::{
    DubReport, DurationMatcher, Pipeline, PipelineConfig, ensure_distinct_output, validate_input,
};
use crate::stt::{WhisperConfig, WhisperTranscriber};
use crate::translate::GoogleTranslatorFactory;
use crate::tts::google::GoogleSynthesizer;
use std::sync::Arc;
use std::time::Duration;

/// Number of translated segments shown after a run.
const SUMMARY_PREVIEW: usize = 5;

/// Fold `redub dub` flags into the loaded configuration. Flags win.
pub fn apply_dub_overrides(mut config: Config, args: &DubArgs) -> Config {
    if let Some(target) = &args.target {
        config.translation.target_language = target.clone();
    }
    if let Some(model) = &args.model {
        config.stt.model = model.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = Some(dir.clone());
    }
    if let Some(pause) = args.rate_limit_pause {
        config.translation.rate_limit_pause_ms = pause.as_millis() as u64;
    }
    config
}

/// Pipeline settings derived from a validated configuration.
pub fn pipeline_config(config: &Config, args: &DubArgs) -> Result<PipelineConfig> {
    let target = resolve_language(&config.translation.target_language)?;
    let mut pipeline = PipelineConfig::new(target);
    pipeline.source_language = config.translation.source_language.clone();
    pipeline.sample_rate = config.audio.sample_rate;
    pipeline.retry = config.translation.retry_policy();
    pipeline.matcher = DurationMatcher::default();
    pipeline.output_dir = config.output.directory.clone();
    pipeline.output = args.output.clone();
    Ok(pipeline)
}

/// Run `redub dub`: validate, check the environment, dub, summarize.
///
/// # Arguments
/// * `config` - Base configuration (already merged with environment overrides)
/// * `args` - Parsed `dub` flags
/// * `quiet` - Suppress status messages
/// * `verbosity` - Verbosity level (0=default, 1=segment warnings, 2=full diagnostics)
pub fn run_dub_command(
    config: Config,
    args: &DubArgs,
    quiet: bool,
    verbosity: u8,
) -> Result<DubReport> {
    let config = apply_dub_overrides(config, args);
    config.validate()?;
    validate_input(&args.input)?;
    if let Some(output) = &args.output {
        ensure_distinct_output(&args.input, output)?;
    }

    let executor = SystemCommandExecutor::new();
    let allow_download = !args.no_download;
    check_environment(&executor, &config).ensure_ready(allow_download)?;

    let model_path = ensure_model(&config.stt.model, allow_download, !quiet)?;
    if verbosity >= 2 {
        eprintln!("Model: {}", model_path.display());
        eprintln!("Config: {:?}", config);
    }

    let transcriber = WhisperTranscriber::new(WhisperConfig {
        model_path,
        language: config.stt.language.clone(),
        threads: config.stt.threads,
    })?;

    let media: Arc<dyn MediaTool> = Arc::new(FfmpegTool::new(
        executor,
        &config.media.ffmpeg,
        &config.media.ffprobe,
    ));
    let synthesizer = GoogleSynthesizer::new(
        &config.synthesis.endpoint,
        Duration::from_secs(config.synthesis.timeout_secs),
        Arc::clone(&media),
        config.audio.sample_rate,
    )?
    .slow(config.synthesis.slow);
    let translators = GoogleTranslatorFactory::new(
        &config.translation.endpoint,
        Duration::from_secs(config.translation.timeout_secs),
    );

    let mut pipeline = Pipeline::new(
        pipeline_config(&config, args)?,
        Arc::new(transcriber),
        Arc::new(translators),
        Arc::new(synthesizer),
        media,
    )
    .with_reporter(Arc::new(TerminalReporter::new(quiet, verbosity)));

    if !quiet {
        eprintln!(
            "Dubbing {} into {} → {}",
            args.input.display(),
            pipeline.config().target.name,
            pipeline.output_path(&args.input).display()
        );
    }

    let report = pipeline.run(&args.input)?;

    if let Some(path) = &args.report {
        report.write_json(path)?;
        if !quiet {
            eprintln!("Report written to {}", path.display());
        }
    }
    if !quiet {
        print_summary(&report, SUMMARY_PREVIEW);
    }
    Ok(report)
}
