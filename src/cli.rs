//! Command-line interface for redub
//!
//! Provides argument parsing using clap derive macros.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Re-dub English-narrated videos into another spoken language
#[derive(Parser, Debug)]
#[command(
    name = "redub",
    version,
    about = "Re-dub English-narrated videos into another spoken language"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: segment warnings, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a pause length.
///
/// Bare numbers are seconds; anything else goes through `humantime`
/// (`500ms`, `2s`, `1m30s`).
fn parse_pause(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Arguments of `redub dub`.
#[derive(Args, Debug)]
pub struct DubArgs {
    /// Input video (.mp4)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Target language code (e.g., zh-CN, es, fr). Run `redub languages` for the list
    #[arg(long, short = 't', value_name = "LANG")]
    pub target: Option<String>,

    /// Whisper model (default: base)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Exact output file (default: <input>_<lang>_audio.mp4)
    #[arg(long, short = 'o', value_name = "PATH", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for the output file (default: next to the input)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write a JSON report of every dubbed segment
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Prevent automatic model download if the configured model is missing
    #[arg(long)]
    pub no_download: bool,

    /// Pause between translation batches (e.g., 500ms, 2s; 0 disables)
    #[arg(long, value_name = "DURATION", value_parser = parse_pause)]
    pub rate_limit_pause: Option<Duration>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dub a video into another language
    Dub(DubArgs),

    /// List supported target languages
    Languages,

    /// Check system dependencies
    Check,

    /// Manage Whisper models
    Models {
        /// Action to perform
        #[command(subcommand)]
        action: ModelsAction,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file location
    Path,
}

/// Model management actions
#[derive(Subcommand, Debug)]
pub enum ModelsAction {
    /// List available models
    List,
    /// Download and install a model
    Install {
        /// Model name (e.g., base, small.en, tiny)
        name: String,
    },
}
