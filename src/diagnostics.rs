//! System diagnostics and dependency checking.
//!
//! Verifies that ffmpeg, ffprobe and a Whisper model are available before a
//! dub starts, and renders the same findings for `redub check`.

use crate::config::Config;
use crate::defaults;
use crate::error::{RedubError, Result};
use crate::media::CommandExecutor;
use crate::models::download::model_path;
use std::path::PathBuf;

/// Result of a dependency check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues
    Warning(String),
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckResult::Ok)
    }
}

/// Check if a media tool exists and runs. ffmpeg and ffprobe take `-version`.
pub fn check_tool(executor: &dyn CommandExecutor, tool: &str) -> CheckResult {
    match executor.execute(tool, &["-version"]) {
        Ok(_) => CheckResult::Ok,
        Err(RedubError::ToolNotFound { .. }) => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("'{}' found but -version failed: {}", tool, e)),
    }
}

/// Everything a dub needs from the host system.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentReport {
    pub ffmpeg: CheckResult,
    pub ffprobe: CheckResult,
    pub whisper_compiled: bool,
    pub model_name: String,
    pub model_path: PathBuf,
    pub model_installed: bool,
}

impl EnvironmentReport {
    /// Install hints for every missing piece. A missing model is only a
    /// problem when it may not be downloaded.
    pub fn guidance(&self, allow_download: bool) -> Vec<String> {
        let mut hints = Vec::new();
        if !self.ffmpeg.is_ok() {
            hints.push(tool_hint("ffmpeg", &self.ffmpeg));
        }
        if !self.ffprobe.is_ok() {
            hints.push(tool_hint("ffprobe", &self.ffprobe));
        }
        if !self.whisper_compiled {
            hints.push(
                "Speech recognition is not compiled in.\n  \
                 Rebuild with: cargo build --release --features whisper"
                    .to_string(),
            );
        }
        if !self.model_installed && !allow_download {
            hints.push(format!(
                "Whisper model '{}' is not installed at {}.\n  \
                 Install it with: redub models install {}",
                self.model_name,
                self.model_path.display(),
                self.model_name
            ));
        }
        hints
    }

    /// Refuse to start when anything required is missing.
    pub fn ensure_ready(&self, allow_download: bool) -> Result<()> {
        let hints = self.guidance(allow_download);
        if hints.is_empty() {
            return Ok(());
        }
        Err(RedubError::EnvironmentNotReady {
            guidance: hints.join("\n"),
        })
    }
}

fn tool_hint(tool: &str, result: &CheckResult) -> String {
    match result {
        CheckResult::Warning(msg) => format!("{tool}: {msg}"),
        _ => format!(
            "{tool} not found.\n  \
             Install: sudo apt install ffmpeg     (Debian/Ubuntu)\n           \
             sudo pacman -S ffmpeg      (Arch)\n           \
             brew install ffmpeg        (macOS)"
        ),
    }
}

/// Probe the host for the tools and model named in `config`.
pub fn check_environment(executor: &dyn CommandExecutor, config: &Config) -> EnvironmentReport {
    let path = model_path(&config.stt.model);
    EnvironmentReport {
        ffmpeg: check_tool(executor, &config.media.ffmpeg),
        ffprobe: check_tool(executor, &config.media.ffprobe),
        whisper_compiled: cfg!(feature = "whisper"),
        model_name: config.stt.model.clone(),
        model_installed: path.exists(),
        model_path: path,
    }
}

fn print_check(label: &str, result: &CheckResult) {
    match result {
        CheckResult::Ok => println!("{label:24}✓ OK"),
        CheckResult::NotFound => println!("{label:24}✗ NOT FOUND"),
        CheckResult::Warning(msg) => {
            println!("{label:24}⚠ WARNING");
            for line in msg.lines() {
                println!("  {}", line);
            }
        }
    }
}

/// Run all dependency checks and print results.
pub fn check_dependencies(executor: &dyn CommandExecutor, config: &Config) -> EnvironmentReport {
    println!(
        "redub {}: checking system dependencies...\n",
        crate::version_string()
    );

    let report = check_environment(executor, config);
    print_check(&format!("{} (remux):", config.media.ffmpeg), &report.ffmpeg);
    print_check(&format!("{} (probe):", config.media.ffprobe), &report.ffprobe);

    if report.whisper_compiled {
        println!("{:24}✓ OK ({})", "whisper:", defaults::gpu_backend());
    } else {
        println!("{:24}✗ NOT COMPILED", "whisper:");
    }

    if report.model_installed {
        println!("{:24}✓ {}", "model:", report.model_name);
    } else {
        println!(
            "{:24}- {} not installed (downloaded on first dub)",
            "model:", report.model_name
        );
    }

    println!();
    let hints = report.guidance(true);
    if hints.is_empty() {
        println!("✓ Ready to dub.");
    } else {
        println!("⚠ Dubbing will not work until these are fixed:");
        for hint in &hints {
            println!("{}", hint);
        }
    }
    report
}
