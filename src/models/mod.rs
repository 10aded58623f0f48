//! Whisper model management.

pub mod catalog;
pub mod download;

pub use catalog::{ModelInfo, get_model, list_models};
pub use download::{
    download_model, ensure_model, is_model_installed, list_installed_models, model_path,
    models_dir,
};
