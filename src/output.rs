//! Terminal rendering for dubbing runs.
//!
//! Stage changes and segment problems go to stderr, the final summary to
//! stdout, so `redub dub ... > summary.txt` captures only the result.

use crate::pipeline::{DubReport, PipelineStage, ProgressReporter, SegmentError};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::{Mutex, PoisonError};

/// Longest translated text shown in the summary preview.
const PREVIEW_TEXT_CHARS: usize = 60;

/// Progress reporter for interactive use.
///
/// `quiet` hides everything except fatal errors; `verbosity >= 1` also shows
/// segment-level warnings, which are otherwise only counted.
pub struct TerminalReporter {
    quiet: bool,
    verbosity: u8,
    bar: Mutex<Option<ProgressBar>>,
    hidden_bar: bool,
}

impl TerminalReporter {
    pub fn new(quiet: bool, verbosity: u8) -> Self {
        Self {
            quiet,
            verbosity,
            bar: Mutex::new(None),
            hidden_bar: false,
        }
    }

    /// Draw nothing even when a bar would be shown. Used by tests.
    pub fn without_bar(mut self) -> Self {
        self.hidden_bar = true;
        self
    }

    fn new_bar(&self, total: usize) -> ProgressBar {
        let pb = ProgressBar::with_draw_target(
            Some(total as u64),
            if self.hidden_bar {
                ProgressDrawTarget::hidden()
            } else {
                ProgressDrawTarget::stderr()
            },
        );
        let style = ProgressStyle::default_bar()
            .template("  [{bar:30.cyan/blue}] {pos}/{len} segments ({eta})")
            .map(|s| s.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }

    fn finish_bar(&self) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print above the bar if one is active.
    fn print_line(&self, line: &str) {
        let bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        match bar.as_ref() {
            Some(pb) => pb.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    /// Position of the active bar, if any.
    pub fn bar_position(&self) -> Option<u64> {
        let bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        bar.as_ref().map(|pb| pb.position())
    }
}

impl ProgressReporter for TerminalReporter {
    fn stage_changed(&self, stage: PipelineStage) {
        self.finish_bar();
        if self.quiet || stage.is_terminal() {
            return;
        }
        self.print_line(&format!("{} {}...", "▸".cyan(), stage.label()));
    }

    fn segment_done(&self, done: usize, total: usize) {
        if self.quiet {
            return;
        }
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        let pb = bar.get_or_insert_with(|| self.new_bar(total));
        pb.set_position(done as u64);
    }

    fn report(&self, stage: PipelineStage, error: &SegmentError) {
        match error {
            SegmentError::Fatal(_) => {
                self.finish_bar();
                eprintln!("{}", format!("Error during {}: {}", stage.label(), error).red());
            }
            SegmentError::Recoverable { .. } => {
                if !self.quiet && self.verbosity >= 1 {
                    self.print_line(&format!("  {} {}", "⚠".yellow(), error));
                }
            }
        }
    }
}

/// `1h 02m 05s`, `3m 07s` or `42.5s`.
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }
    let total = seconds.round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else {
        format!("{}m {:02}s", minutes, secs)
    }
}

/// Human-readable byte count with binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Plain-text summary of a finished run.
pub fn format_summary(report: &DubReport, preview: usize) -> String {
    let mut lines = vec![
        format!("Output:          {}", report.output.display()),
        format!("Duration:        {}", format_duration(report.duration)),
        format!(
            "Segments:        {} dubbed of {} ({} skipped, {} failed)",
            report.segments_dubbed,
            report.segments_total,
            report.segments_skipped,
            report.segments_failed
        ),
        format!("Target language: {}", report.target_language),
        format!("Output size:     {}", format_size(report.output_size_bytes)),
    ];
    if report.fallbacks > 0 {
        lines.push(format!(
            "Fallbacks:       {} segment(s) kept the source text",
            report.fallbacks
        ));
    }

    let shown = report.preview(preview);
    if !shown.is_empty() {
        lines.push(String::new());
        lines.push("Preview:".to_string());
        for segment in shown {
            let marker = if segment.fell_back { " (untranslated)" } else { "" };
            lines.push(format!(
                "  [{:>7.2}s] {}{}",
                segment.start,
                truncate_chars(&segment.translated_text, PREVIEW_TEXT_CHARS),
                marker
            ));
        }
    }
    lines.join("\n")
}

/// Print the summary to stdout.
pub fn print_summary(report: &DubReport, preview: usize) {
    println!("{}", "✓ Dubbing complete".green());
    println!("{}", format_summary(report, preview));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SegmentReport;
    use std::path::PathBuf;

    fn report() -> DubReport {
        DubReport {
            input: PathBuf::from("talk.mp4"),
            output: PathBuf::from("talk_zh_CN_audio.mp4"),
            target_language: "zh-CN".to_string(),
            model: "base".to_string(),
            duration: 125.0,
            output_size_bytes: 3 * 1024 * 1024,
            segments_total: 7,
            segments_dubbed: 6,
            segments_skipped: 1,
            segments_failed: 0,
            fallbacks: 1,
            segments: (0..6)
                .map(|i| SegmentReport {
                    index: i,
                    start: i as f64 * 2.0,
                    end: i as f64 * 2.0 + 1.5,
                    source_text: format!("line {i}"),
                    translated_text: format!("第{i}行"),
                    fell_back: i == 3,
                })
                .collect(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.54), "42.5s");
        assert_eq!(format_duration(187.0), "3m 07s");
        assert_eq!(format_duration(3725.0), "1h 02m 05s");
        assert_eq!(format_duration(-1.0), "0.0s");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("短い", 5), "短い");
        assert_eq!(truncate_chars("abcdef", 4), "abc…");
    }

    #[test]
    fn test_summary_lists_counts_and_preview() {
        let summary = format_summary(&report(), 5);

        assert!(summary.contains("talk_zh_CN_audio.mp4"));
        assert!(summary.contains("2m 05s"));
        assert!(summary.contains("6 dubbed of 7 (1 skipped, 0 failed)"));
        assert!(summary.contains("zh-CN"));
        assert!(summary.contains("3.0 MiB"));
        assert!(summary.contains("第4行"));
        assert!(!summary.contains("第5行"));
        assert_eq!(summary.matches("(untranslated)").count(), 1);
    }

    #[test]
    fn test_summary_without_segments_has_no_preview() {
        let mut empty = report();
        empty.segments.clear();
        empty.fallbacks = 0;
        let summary = format_summary(&empty, 5);
        assert!(!summary.contains("Preview"));
        assert!(!summary.contains("Fallbacks"));
    }

    #[test]
    fn test_reporter_tracks_segment_progress() {
        let reporter = TerminalReporter::new(false, 0).without_bar();
        reporter.stage_changed(PipelineStage::Translating);
        assert_eq!(reporter.bar_position(), None);

        reporter.segment_done(1, 4);
        reporter.segment_done(2, 4);
        assert_eq!(reporter.bar_position(), Some(2));

        reporter.stage_changed(PipelineStage::Assembling);
        assert_eq!(reporter.bar_position(), None);
    }

    #[test]
    fn test_quiet_reporter_never_creates_bar() {
        let reporter = TerminalReporter::new(true, 2).without_bar();
        reporter.segment_done(1, 4);
        reporter.report(
            PipelineStage::Translating,
            &SegmentError::recoverable(0, "synthesis failed"),
        );
        assert_eq!(reporter.bar_position(), None);
    }

    #[test]
    fn test_fatal_report_clears_bar() {
        let reporter = TerminalReporter::new(false, 0).without_bar();
        reporter.segment_done(1, 4);
        reporter.report(
            PipelineStage::Remuxing,
            &SegmentError::Fatal("remux failed".to_string()),
        );
        assert_eq!(reporter.bar_position(), None);
    }
}
