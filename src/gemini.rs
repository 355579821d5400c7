//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::{Config, ConfigError};

const PROMPT_PREFIX: &str = "Answer this question clearly and concisely:\n\n";

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response contained no text")]
    EmptyResponse,
}

/// Something that turns a prompt into an answer.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}

pub fn build_prompt(cleaned: &str) -> String {
    format!("{PROMPT_PREFIX}{cleaned}")
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Join the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, GeminiError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(GeminiError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Prefer the API's own `error.message`, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn endpoint(base: &Url, model: &str) -> Result<Url, url::ParseError> {
    let model = model.trim_start_matches("models/");
    base.join(&format!("models/{model}:generateContent"))
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: Url,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_string();
        let endpoint = endpoint(&config.api_base, &config.model)
            .map_err(|e| ConfigError::InvalidApiBase(config.api_base.to_string(), e))?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
        })
    }
}

#[async_trait]
impl AnswerGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        tracing::debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "calling Gemini");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        let parsed: GenerateResponse = response.json().await?;
        extract_text(parsed)
    }
}
