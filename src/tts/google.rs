//! Google Translate text-to-speech over the `translate_tts` endpoint.
//!
//! The endpoint only accepts short inputs, so text is split at word
//! boundaries, each chunk is fetched as MP3, and the concatenated stream is
//! decoded through the media tool into a mono WAV clip.

use crate::audio::AudioClip;
use crate::defaults;
use crate::error::{RedubError, Result};
use crate::media::MediaTool;
use crate::tts::Synthesizer;
use reqwest::Url;
use reqwest::blocking::Client;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Longest text the endpoint accepts per request, in characters.
pub const MAX_CHUNK_CHARS: usize = 100;

pub struct GoogleSynthesizer {
    client: Client,
    endpoint: String,
    media: Arc<dyn MediaTool>,
    sample_rate: u32,
    slow: bool,
}

impl std::fmt::Debug for GoogleSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSynthesizer")
            .field("endpoint", &self.endpoint)
            .field("sample_rate", &self.sample_rate)
            .field("slow", &self.slow)
            .finish()
    }
}

impl GoogleSynthesizer {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        media: Arc<dyn MediaTool>,
        sample_rate: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("redub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RedubError::Synthesis {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            media,
            sample_rate,
            slow: false,
        })
    }

    /// Default endpoint and timeout at the canonical sample rate.
    pub fn with_media(media: Arc<dyn MediaTool>) -> Result<Self> {
        Self::new(
            DEFAULT_ENDPOINT,
            Duration::from_secs(defaults::HTTP_TIMEOUT_SECS),
            media,
            defaults::SAMPLE_RATE,
        )
    }

    /// Request the slower speaking rate.
    pub fn slow(mut self, slow: bool) -> Self {
        self.slow = slow;
        self
    }

    fn chunk_url(&self, chunk: &str, voice: &str, idx: usize, total: usize) -> Result<Url> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", voice),
                ("q", chunk),
                ("ttsspeed", if self.slow { "0.24" } else { "1" }),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ],
        )
        .map_err(|e| RedubError::Synthesis {
            message: format!("invalid endpoint '{}': {e}", self.endpoint),
        })
    }

    fn fetch_chunk(&self, url: Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| RedubError::Synthesis {
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedubError::Synthesis {
                message: format!("service answered with status {status}"),
            });
        }

        let bytes = response.bytes().map_err(|e| RedubError::Synthesis {
            message: format!("failed to read audio: {e}"),
        })?;
        Ok(bytes.to_vec())
    }
}

impl Synthesizer for GoogleSynthesizer {
    fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(RedubError::Synthesis {
                message: "nothing to speak".to_string(),
            });
        }

        let mut mp3 = tempfile::Builder::new()
            .prefix("redub-tts-")
            .suffix(".mp3")
            .tempfile()?;
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, voice, idx, chunks.len())?;
            let bytes = self.fetch_chunk(url)?;
            mp3.write_all(&bytes)?;
        }
        mp3.flush()?;

        let wav = tempfile::Builder::new()
            .prefix("redub-tts-")
            .suffix(".wav")
            .tempfile()?;
        self.media
            .extract_audio(mp3.path(), wav.path(), self.sample_rate)?;

        let clip = AudioClip::from_wav_file(wav.path(), self.sample_rate)?;
        if clip.is_empty() {
            return Err(RedubError::Synthesis {
                message: "decoded speech is empty".to_string(),
            });
        }
        Ok(clip)
    }
}

/// Split `text` into chunks of at most `max_chars` characters, breaking at
/// whitespace. Words longer than the limit are cut mid-word.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
