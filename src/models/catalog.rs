//! Whisper model metadata catalog.

use crate::defaults;

/// Metadata for a ggml Whisper model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    /// Model identifier (e.g., "tiny.en", "base")
    pub name: &'static str,
    /// Model size in megabytes
    pub size_mb: u32,
    /// SHA-1 checksum of the model file
    pub sha1: &'static str,
    /// Whether this model only understands English
    pub english_only: bool,
}

impl ModelInfo {
    /// Download URL on HuggingFace.
    pub fn url(&self) -> String {
        format!(
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
            self.file_name()
        )
    }

    /// `ggml-<name>.bin`
    pub fn file_name(&self) -> String {
        model_file_name(self.name)
    }
}

pub fn model_file_name(name: &str) -> String {
    format!("ggml-{}.bin", name)
}

const fn model(name: &'static str, size_mb: u32, sha1: &'static str) -> ModelInfo {
    ModelInfo {
        name,
        size_mb,
        sha1,
        english_only: false,
    }
}

const fn english(name: &'static str, size_mb: u32, sha1: &'static str) -> ModelInfo {
    ModelInfo {
        name,
        size_mb,
        sha1,
        english_only: true,
    }
}

/// Models from tiny (fast, rough timestamps) to medium (slow, accurate).
pub const MODELS: &[ModelInfo] = &[
    english("tiny.en", 75, "c78c86eb1a8faa21b369bcd33207cc90d64ae9df"),
    model("tiny", 75, "bd577a113a864445d4c299885e0cb97d4ba92b5f"),
    english("base.en", 142, "137c40403d78fd54d454da0f9bd998f78703390c"),
    model("base", 142, "465707469ff3a37a2b9b8d8f89f2f99de7299dac"),
    english("small.en", 466, "db8a495a91d927739e50b3fc1cc4c6b8f6c2d022"),
    model("small", 466, "55356645c2b361a969dfd0ef2c5a50d530afd8d5"),
    english("medium.en", 1533, "8c30f0e44ce9560643ebd10bbe50cd20eafd3723"),
    model("medium", 1533, "fd9727b6e1217c2f614f9b698455c4ffd82463b4"),
];

/// Find a model by name.
pub fn get_model(name: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.name == name)
}

pub fn list_models() -> &'static [ModelInfo] {
    MODELS
}

/// The model used when nothing is configured.
pub fn default_model() -> Option<&'static ModelInfo> {
    get_model(defaults::DEFAULT_MODEL)
}

/// Whether `name` refers to an English-only variant.
pub fn is_english_only(name: &str) -> bool {
    name.ends_with(defaults::ENGLISH_ONLY_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_get_model_exists() {
        let model = get_model("tiny.en").unwrap();
        assert_eq!(model.name, "tiny.en");
        assert_eq!(model.size_mb, 75);
        assert!(model.english_only);
    }

    #[test]
    fn test_get_model_not_found() {
        assert!(get_model("nonexistent").is_none());
        assert!(get_model("large").is_none());
    }

    #[test]
    fn test_catalog_has_eight_unique_models() {
        let names: HashSet<&str> = list_models().iter().map(|m| m.name).collect();
        assert_eq!(list_models().len(), 8);
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_checksums_are_sha1_hex() {
        for model in list_models() {
            assert_eq!(model.sha1.len(), 40, "{}", model.name);
            assert!(model.sha1.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_english_only_flag_matches_suffix() {
        for model in list_models() {
            assert_eq!(model.english_only, is_english_only(model.name));
        }
    }

    #[test]
    fn test_url_points_at_ggml_file() {
        let model = get_model("base").unwrap();
        assert_eq!(
            model.url(),
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin"
        );
    }

    #[test]
    fn test_default_model_is_multilingual_base() {
        let model = default_model().unwrap();
        assert_eq!(model.name, "base");
        assert!(!model.english_only);
    }
}
