//! Supported dubbing target languages.
//!
//! A fixed table mapping each user-facing language code to the code the
//! translation service expects and the voice variant used for synthesis.

use crate::error::{RedubError, Result};

/// One dubbing target.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    /// Code accepted on the command line and in config (e.g., "zh-CN", "pt")
    pub code: &'static str,
    /// English display name
    pub name: &'static str,
    /// Name of the language in the language itself
    pub native_name: &'static str,
    /// Code sent to the translation service
    pub translation_code: &'static str,
    /// Voice variant requested from the speech synthesizer
    pub synthesis_variant: &'static str,
}

impl Language {
    /// Code fragment used in output file names ("zh-CN" → "zh_CN").
    pub fn file_suffix(&self) -> String {
        self.code.replace('-', "_")
    }
}

const fn lang(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    synthesis_variant: &'static str,
) -> Language {
    Language {
        code,
        name,
        native_name,
        translation_code: code,
        synthesis_variant,
    }
}

pub const LANGUAGES: &[Language] = &[
    lang("zh-CN", "Chinese (Simplified)", "简体中文", "zh-CN"),
    lang("zh-TW", "Chinese (Traditional)", "繁體中文", "zh-TW"),
    lang("es", "Spanish", "Español", "es"),
    lang("fr", "French", "Français", "fr"),
    lang("de", "German", "Deutsch", "de"),
    lang("it", "Italian", "Italiano", "it"),
    lang("pt", "Portuguese (Brazilian)", "Português", "pt-br"),
    lang("ja", "Japanese", "日本語", "ja"),
    lang("ko", "Korean", "한국어", "ko"),
    lang("ru", "Russian", "Русский", "ru"),
    lang("ar", "Arabic", "العربية", "ar"),
    lang("hi", "Hindi", "हिन्दी", "hi"),
    lang("th", "Thai", "ไทย", "th"),
    lang("vi", "Vietnamese", "Tiếng Việt", "vi"),
    lang("nl", "Dutch", "Nederlands", "nl"),
    lang("pl", "Polish", "Polski", "pl"),
    lang("tr", "Turkish", "Türkçe", "tr"),
    lang("sv", "Swedish", "Svenska", "sv"),
    lang("da", "Danish", "Dansk", "da"),
    lang("no", "Norwegian", "Norsk", "no"),
];

/// Find a language by code. Matching ignores ASCII case ("zh-cn" finds "zh-CN").
pub fn get_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

/// Like [`get_language`] but with an error naming the rejected code.
pub fn resolve_language(code: &str) -> Result<&'static Language> {
    get_language(code).ok_or_else(|| RedubError::UnsupportedLanguage {
        code: code.to_string(),
    })
}

pub fn list_languages() -> &'static [Language] {
    LANGUAGES
}

/// Format a language for display.
pub fn format_language(language: &Language) -> String {
    format!(
        "{:6} {:24} {}",
        language.code, language.name, language.native_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_twenty_unique_codes() {
        let codes: HashSet<&str> = LANGUAGES.iter().map(|l| l.code).collect();
        assert_eq!(LANGUAGES.len(), 20);
        assert_eq!(codes.len(), 20);
    }

    #[test]
    fn portuguese_synthesizes_brazilian_variant() {
        let pt = get_language("pt").unwrap();
        assert_eq!(pt.translation_code, "pt");
        assert_eq!(pt.synthesis_variant, "pt-br");
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(get_language("zh-cn").unwrap().code, "zh-CN");
        assert_eq!(get_language("DE").unwrap().name, "German");
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(get_language("xx").is_none());
        match resolve_language("klingon") {
            Err(RedubError::UnsupportedLanguage { code }) => assert_eq!(code, "klingon"),
            other => panic!("Expected UnsupportedLanguage, got {:?}", other),
        }
    }

    #[test]
    fn file_suffix_replaces_dashes() {
        assert_eq!(get_language("zh-TW").unwrap().file_suffix(), "zh_TW");
        assert_eq!(get_language("fr").unwrap().file_suffix(), "fr");
    }

    #[test]
    fn default_target_is_in_table() {
        assert!(get_language(crate::defaults::TARGET_LANGUAGE).is_some());
    }

    #[test]
    fn format_language_contains_code_and_names() {
        let line = format_language(get_language("ja").unwrap());
        assert!(line.starts_with("ja"));
        assert!(line.contains("Japanese"));
        assert!(line.contains("日本語"));
    }
}
