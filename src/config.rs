use secrecy::SecretString;

use crate::error::{Error, Result};

/// Directory MIDI files land in unless overridden on the command line.
pub const OUTPUT_DIR: &str = "output_music";

/// Directory generated lyrics are saved to.
pub const LYRICS_DIR: &str = "generated_lyrics";

/// Ticks per quarter note (PPQN).
pub const TICKS_PER_BEAT: u16 = 480;

pub const NOTE_VELOCITY: u8 = 100;
pub const MIDI_CHANNEL: u8 = 0;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;

        let mut settings = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                settings.model = model;
            }
        }
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            if !url.trim().is_empty() {
                settings.base_url = url;
            }
        }
        Ok(settings)
    }
}
