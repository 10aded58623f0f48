//! Google Translate client over the public `translate_a/single` endpoint.

use crate::defaults;
use crate::error::{RedubError, Result};
use crate::translate::translator::{Translator, TranslatorFactory};
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// One translation session for a fixed language pair.
#[derive(Debug)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    source: String,
    target: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: &str, source: &str, target: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("redub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RedubError::Translation {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    fn request_url(&self, text: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| RedubError::Translation {
            message: format!("invalid endpoint '{}': {e}", self.endpoint),
        })
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        let url = self.request_url(text)?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| RedubError::Translation {
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedubError::Translation {
                message: format!("service answered with status {status}"),
            });
        }

        let body = response.text().map_err(|e| RedubError::Translation {
            message: format!("failed to read response: {e}"),
        })?;
        parse_response(&body)
    }
}

/// Creates a [`GoogleTranslator`] per call.
#[derive(Debug, Clone)]
pub struct GoogleTranslatorFactory {
    endpoint: String,
    timeout: Duration,
}

impl GoogleTranslatorFactory {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout,
        }
    }
}

impl Default for GoogleTranslatorFactory {
    fn default() -> Self {
        Self::new(
            DEFAULT_ENDPOINT,
            Duration::from_secs(defaults::HTTP_TIMEOUT_SECS),
        )
    }
}

impl TranslatorFactory for GoogleTranslatorFactory {
    fn create(&self, source: &str, target: &str) -> Result<Box<dyn Translator>> {
        Ok(Box::new(GoogleTranslator::new(
            &self.endpoint,
            source,
            target,
            self.timeout,
        )?))
    }
}

/// Join the translated sentence chunks of a `dt=t` response.
///
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` pairs, one per sentence.
fn parse_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body).map_err(|e| RedubError::Translation {
        message: format!("malformed response: {e}"),
    })?;

    let sentences = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| RedubError::Translation {
            message: "response carries no sentences".to_string(),
        })?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(RedubError::Translation {
            message: "response carries an empty translation".to_string(),
        });
    }
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_sentence() {
        let body = r#"[[["Bonjour","Hello",null,null,10]],null,"en"]"#;
        assert_eq!(parse_response(body).unwrap(), "Bonjour");
    }

    #[test]
    fn test_parse_joins_sentences() {
        let body = r#"[[["Bonjour. ","Hello. ",null,null,10],["Comment ça va?","How are you?",null,null,10]],null,"en"]"#;
        assert_eq!(parse_response(body).unwrap(), "Bonjour. Comment ça va?");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_response("<html>rate limited</html>"),
            Err(RedubError::Translation { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_missing_sentences() {
        assert!(parse_response("[null,null,\"en\"]").is_err());
        assert!(parse_response("[[],null,\"en\"]").is_err());
    }

    #[test]
    fn test_request_url_encodes_query() {
        let translator =
            GoogleTranslator::new(DEFAULT_ENDPOINT, "en", "zh-CN", Duration::from_secs(5))
                .unwrap();

        let url = translator.request_url("fish & chips?").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(url.as_str().starts_with(DEFAULT_ENDPOINT));
        assert!(pairs.contains(&("tl".to_string(), "zh-CN".to_string())));
        assert!(pairs.contains(&("q".to_string(), "fish & chips?".to_string())));
    }

    #[test]
    fn test_invalid_endpoint_is_translation_error() {
        let translator =
            GoogleTranslator::new("not a url", "en", "fr", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            translator.request_url("hello"),
            Err(RedubError::Translation { .. })
        ));
    }

    #[test]
    fn test_factory_creates_boxed_client() {
        let factory = GoogleTranslatorFactory::default();
        assert!(factory.create("en", "fr").is_ok());
    }
}
