use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::generation::GenerateRequest;

const DEFAULT_DAYS: u32 = 3;
const MAX_DAYS: u32 = 14;
const REQUEST_TIMEOUT_SECS: u64 = 90;

const SYSTEM_PROMPT: &str = "You are a travel planner. Write day-by-day itineraries. \
Start every day with a heading of the form \"Day N\". Put each stop on its own line as \
\"H:MM AM - Place: short description\".";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatStreamChunk {
    #[serde(default)]
    choices: Vec<ChatStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatStreamChoice {
    #[serde(default)]
    delta: ChatDelta,
}

#[derive(Debug, Deserialize, Default)]
struct ChatDelta {
    content: Option<String>,
}

/// Incremental reader for a chat completions event stream. Bytes may arrive
/// split anywhere; only complete `data:` lines are decoded.
#[derive(Debug, Default)]
pub struct ChatStreamDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl ChatStreamDecoder {
    /// Feeds one network chunk and returns the text deltas it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut deltas = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(delta) = self.decode_line(line.trim()) {
                deltas.push(delta);
            }
        }
        deltas
    }

    /// True once the `[DONE]` marker was read. Later lines are ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn decode_line(&mut self, line: &str) -> Option<String> {
        if self.done {
            return None;
        }
        let data = line.strip_prefix("data:")?.trim_start();
        if data == "[DONE]" {
            self.done = true;
            return None;
        }

        match serde_json::from_str::<ChatStreamChunk>(data) {
            Ok(chunk) => chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .filter(|content| !content.is_empty()),
            Err(err) => {
                log::debug!("Skipping unreadable stream line: {}", err);
                None
            }
        }
    }
}

pub type TextStream = BoxStream<'static, Result<String, GenerationError>>;

#[derive(Debug)]
pub enum GenerationError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ApiError(String),
    EmptyResponse,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GenerationError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GenerationError::ApiError(msg) => write!(f, "API error: {}", msg),
            GenerationError::EmptyResponse => write!(f, "Model returned no content"),
        }
    }
}

impl Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::HttpError(err)
    }
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GenerationService {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GenerationService {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: api_url.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .ai_api_key
            .clone()
            .ok_or_else(|| GenerationError::EnvironmentError("AI_API_KEY not set".to_string()))?;
        Self::new(api_key, config.ai_api_url.clone(), config.ai_model.clone())
    }

    async fn send_chat(
        &self,
        system: &str,
        prompt: &str,
        stream: bool,
    ) -> Result<Response, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
            stream,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError(format!("{}: {}", status, text)));
        }
        Ok(response)
    }

    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let response = self.send_chat(system, prompt, false).await?;

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    /// Asks the model for a full itinerary and returns its raw text.
    pub async fn generate_itinerary(
        &self,
        request: &GenerateRequest,
    ) -> Result<String, GenerationError> {
        let prompt = build_itinerary_prompt(request);
        log::debug!("Generation prompt: {}", prompt);
        self.complete(SYSTEM_PROMPT, &prompt).await
    }

    /// Same prompt as `generate_itinerary`, answered piece by piece as the
    /// model writes it.
    pub async fn stream_itinerary(
        &self,
        request: &GenerateRequest,
    ) -> Result<TextStream, GenerationError> {
        let prompt = build_itinerary_prompt(request);
        log::debug!("Streaming generation prompt: {}", prompt);
        let response = self.send_chat(SYSTEM_PROMPT, &prompt, true).await?;

        let mut decoder = ChatStreamDecoder::default();
        let deltas = response
            .bytes_stream()
            .map_err(GenerationError::from)
            .map_ok(move |chunk| {
                stream::iter(
                    decoder
                        .feed(&chunk)
                        .into_iter()
                        .map(Ok::<String, GenerationError>),
                )
            })
            .try_flatten();

        Ok(deltas.boxed())
    }
}

pub fn build_itinerary_prompt(request: &GenerateRequest) -> String {
    let days = request.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
    let destinations = request
        .destinations
        .iter()
        .map(|d| d.name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!("Plan a {}-day trip to {}.", days, destinations);

    if !request.preferences.trim().is_empty() {
        prompt.push_str(&format!(
            " The traveler is interested in: {}.",
            request.preferences.trim()
        ));
    }

    if let Some(tips) = request
        .tiktok_tips
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        prompt.push_str(&format!(
            " Work in these recommendations where they fit: {}.",
            tips
        ));
    }

    prompt.push_str(&format!(
        " Write exactly {} days, each starting with \"Day N\", with 3 to 5 timed stops per day.",
        days
    ));
    prompt
}
