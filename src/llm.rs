//! Text generation backend for the mood and lyrics prompts.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::GeminiSettings;
use crate::error::{Error, Result};

/// Anything that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<OutPart<'a>>,
}

#[derive(Debug, Serialize)]
struct OutPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<InPart>,
}

#[derive(Debug, Deserialize)]
struct InPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Google Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: GeminiSettings,
    http_client: HttpClient,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings, http_client: HttpClient) -> Self {
        Self {
            settings,
            http_client,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GeminiSettings::from_env()?, HttpClient::new()))
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![OutPart { text: prompt }],
            }],
        };

        let url = self.endpoint();
        tracing::debug!(target: "lyric_midi_gen::llm", %url, model = %self.settings.model, "sending request");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.settings.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(target: "lyric_midi_gen::llm", status = status.as_u16(), "response received");

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
