//! Model download and installation management.
//!
//! Downloads ggml Whisper models from HuggingFace into the user's cache
//! directory and verifies them against the catalog checksum.

use crate::error::{RedubError, Result};
use crate::models::catalog::{ModelInfo, get_model, list_models, model_file_name};
use indicatif::{ProgressBar, ProgressStyle};
use sha1::{Digest, Sha1};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Directory where models are stored.
///
/// Uses `~/.cache/redub/models/` on Linux/Unix.
pub fn models_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("redub")
        .join("models")
}

/// Full path for a model file. The file may or may not exist.
pub fn model_path(name: &str) -> PathBuf {
    models_dir().join(model_file_name(name))
}

pub fn is_model_installed(name: &str) -> bool {
    model_path(name).exists()
}

fn download_error(message: String) -> RedubError {
    RedubError::ModelDownload { message }
}

/// Copy `reader` into `writer`, returning the SHA-1 of everything copied.
fn copy_hashed<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    progress: Option<&ProgressBar>,
) -> Result<String> {
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| download_error(format!("Failed to read download chunk: {e}")))?;
        if n == 0 {
            break;
        }
        writer.write_all(&buffer[..n])?;
        hasher.update(&buffer[..n]);
        if let Some(pb) = progress {
            pb.inc(n as u64);
        }
    }
    writer.flush()?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Fetch `info` into `output_path`, verifying its checksum.
///
/// Data goes to a `.part` file first, so an interrupted download never
/// looks installed.
fn download_to_path(info: &ModelInfo, output_path: &Path, progress: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| download_error(format!("Failed to create models directory: {e}")))?;
    }

    if progress {
        eprintln!("Downloading {} ({} MB)...", info.name, info.size_mb);
    }

    let response = reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
        .and_then(|client| client.get(info.url()).send())
        .map_err(|e| download_error(format!("Failed to start download: {e}")))?;

    if !response.status().is_success() {
        return Err(download_error(format!(
            "Download failed with status: {}",
            response.status()
        )));
    }

    let pb = progress.then(|| progress_bar(response.content_length().unwrap_or(0)));

    let partial = output_path.with_extension("bin.part");
    let file = fs::File::create(&partial)
        .map_err(|e| download_error(format!("Failed to create output file: {e}")))?;
    let calculated = copy_hashed(response, file, pb.as_ref());

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let calculated = match calculated {
        Ok(hash) => hash,
        Err(e) => {
            remove_quietly(&partial);
            return Err(e);
        }
    };

    if calculated != info.sha1 {
        remove_quietly(&partial);
        return Err(download_error(format!(
            "SHA-1 checksum mismatch. Expected: {}, got: {calculated}",
            info.sha1
        )));
    }

    fs::rename(&partial, output_path)?;
    if progress {
        eprintln!("Checksum verified");
        eprintln!("Model installed to: {}", output_path.display());
    }
    Ok(())
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        eprintln!("redub: failed to remove partial download {}: {e}", path.display());
    }
}

/// Download a Whisper model from the catalog.
///
/// Returns the installed path; an existing file is returned as is.
pub fn download_model(name: &str, progress: bool) -> Result<PathBuf> {
    let path = model_path(name);
    if path.exists() {
        return Ok(path);
    }

    let info = get_model(name).ok_or_else(|| {
        download_error(format!(
            "Model '{name}' is not in the catalog.\n\
             Run 'redub models list' to see available models."
        ))
    })?;

    download_to_path(info, &path, progress)?;
    Ok(path)
}

/// Path of an installed model, downloading it first when allowed.
pub fn ensure_model(name: &str, allow_download: bool, progress: bool) -> Result<PathBuf> {
    let path = model_path(name);
    if path.exists() {
        return Ok(path);
    }
    if !allow_download {
        return Err(RedubError::TranscriptionModelNotFound {
            path: path.display().to_string(),
        });
    }
    download_model(name, progress)
}

/// Names of all `ggml-*.bin` files in the models directory, sorted.
pub fn list_installed_models() -> Vec<String> {
    let entries = match fs::read_dir(models_dir()) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_str()?;
            let model = name.strip_prefix("ggml-")?.strip_suffix(".bin")?;
            entry.path().is_file().then(|| model.to_string())
        })
        .collect();

    names.sort();
    names
}

/// First catalog model found on disk.
pub fn find_any_installed_model() -> Option<String> {
    list_models()
        .iter()
        .find(|m| is_model_installed(m.name))
        .map(|m| m.name.to_string())
}

/// Format model information for display.
pub fn format_model_info(model: &ModelInfo) -> String {
    let status = if is_model_installed(model.name) {
        "[installed]"
    } else {
        "[not installed]"
    };
    let scope = if model.english_only {
        "English"
    } else {
        "multilingual"
    };
    format!(
        "{:12} {:5} MB   {:13} {}",
        model.name, model.size_mb, scope, status
    )
}
