use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::models::generation::{ExtractedInfo, COULD_NOT_EXTRACT};
use crate::services::generation_service::{GenerationError, GenerationService};

const OEMBED_URL: &str = "https://www.tiktok.com/oembed";
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(45);

const EXTRACTION_PROMPT: &str = "You read TikTok travel video captions. Reply with exactly two lines: \
\"Destination: <city, country>\" and \"Tips: <short comma-separated tips>\". \
Write \"Could not extract\" for anything the caption does not say.";

/// Preset preference ids and the icon keyword each also answers to.
pub const PREFERENCE_OPTIONS: &[(&str, &str)] = &[
    ("food", "food"),
    ("museums", "museums"),
    ("hiking", "hiking"),
    ("beaches", "beaches"),
    ("nightlife", "nightlife"),
    ("shopping", "shopping"),
    ("history", "history"),
    ("nature", "nature"),
    ("adventure", "adventure"),
    ("relaxation", "relaxation"),
    ("photography", "photography"),
    ("architecture", "architecture"),
    ("local-culture", "culture"),
    ("budget", "budget"),
    ("luxury", "luxury"),
    ("family", "family"),
];

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author_name: String,
}

#[derive(Debug)]
pub enum TikTokError {
    HttpError(reqwest::Error),
    ApiError(u16),
    EmptyCaption,
    Timeout,
    Generation(GenerationError),
}

impl fmt::Display for TikTokError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TikTokError::HttpError(err) => write!(f, "HTTP error: {}", err),
            TikTokError::ApiError(status) => write!(f, "oEmbed returned status {}", status),
            TikTokError::EmptyCaption => write!(f, "Video has no caption"),
            TikTokError::Timeout => write!(f, "Extraction timed out"),
            TikTokError::Generation(err) => write!(f, "Generation error: {}", err),
        }
    }
}

impl Error for TikTokError {}

impl From<reqwest::Error> for TikTokError {
    fn from(err: reqwest::Error) -> Self {
        TikTokError::HttpError(err)
    }
}

impl From<GenerationError> for TikTokError {
    fn from(err: GenerationError) -> Self {
        TikTokError::Generation(err)
    }
}

pub struct TikTokService {
    client: Client,
    generation: GenerationService,
}

impl TikTokService {
    pub fn new(generation: GenerationService) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, generation }
    }

    async fn caption(&self, url: &str) -> Result<String, TikTokError> {
        let response = self
            .client
            .get(OEMBED_URL)
            .query(&[("url", url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TikTokError::ApiError(response.status().as_u16()));
        }

        let embed: OEmbedResponse = response.json().await?;
        if embed.title.trim().is_empty() {
            return Err(TikTokError::EmptyCaption);
        }
        Ok(format!("{} (by {})", embed.title.trim(), embed.author_name))
    }

    async fn extract_one(&self, url: &str) -> Result<ExtractedInfo, TikTokError> {
        let caption = self.caption(url).await?;
        let reply = self.generation.complete(EXTRACTION_PROMPT, &caption).await?;
        let (destination, tips) = parse_extraction_reply(&reply);
        Ok(ExtractedInfo {
            url: url.to_string(),
            destination,
            tips,
        })
    }

    /// Extracts every URL concurrently. A URL that fails still yields an
    /// entry, filled with the could-not-extract marker.
    pub async fn extract(&self, urls: &[String]) -> Vec<ExtractedInfo> {
        let futures = urls.iter().map(|url| async move {
            let result = tokio::time::timeout(EXTRACTION_TIMEOUT, self.extract_one(url))
                .await
                .unwrap_or(Err(TikTokError::Timeout));
            match result {
                Ok(info) => info,
                Err(err) => {
                    log::warn!("Could not extract TikTok {}: {}", url, err);
                    ExtractedInfo::failed(url.as_str())
                }
            }
        });
        join_all(futures).await
    }
}

/// Keeps trimmed, non-empty TikTok links.
pub fn filter_tiktok_urls(urls: &[String]) -> Vec<String> {
    urls.iter()
        .map(|url| url.trim())
        .filter(|url| url.contains("tiktok.com"))
        .map(String::from)
        .collect()
}

/// Reads the "Destination:" and "Tips:" lines of a model reply.
pub fn parse_extraction_reply(reply: &str) -> (String, String) {
    let mut destination = None;
    let mut tips = None;

    for line in reply.lines() {
        let line = line.trim().trim_start_matches(['-', '*']).trim();
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim().to_lowercase().as_str() {
                "destination" => destination = Some(value.to_string()),
                "tips" => tips = Some(value.to_string()),
                _ => {}
            }
        }
    }

    (
        destination.unwrap_or_else(|| COULD_NOT_EXTRACT.to_string()),
        tips.unwrap_or_else(|| COULD_NOT_EXTRACT.to_string()),
    )
}

/// Preset preferences mentioned in the extracted tips.
pub fn matching_preferences(extracted: &[ExtractedInfo]) -> Vec<String> {
    let tip_text = extracted
        .iter()
        .map(|info| info.tips.as_str())
        .filter(|tips| *tips != COULD_NOT_EXTRACT)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if tip_text.is_empty() {
        return Vec::new();
    }

    PREFERENCE_OPTIONS
        .iter()
        .filter(|(id, icon)| tip_text.contains(id) || tip_text.contains(icon))
        .map(|(id, _)| id.to_string())
        .collect()
}
