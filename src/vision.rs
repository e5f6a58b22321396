// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Vision API client for AI-derived screenshot names

use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::{Result, ShutterError};

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Client for an OpenAI-style vision chat-completions endpoint
pub struct VisionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl VisionClient {
    /// Create a new vision client
    pub fn new(config: &ApiConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        // Normalize URL
        let base_url = config
            .url
            .trim_end_matches('/')
            .trim_end_matches("/chat/completions")
            .to_string();

        Self {
            client,
            base_url,
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Create a client with the API key from the environment.
    ///
    /// A missing key is not fatal to the run; callers treat the error as a
    /// signal to fall back to timestamp naming.
    pub fn from_env(config: &ApiConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            ShutterError::VisionUnavailable(format!("{} is not set", API_KEY_VAR))
        })?;
        Ok(Self::new(config, api_key))
    }

    /// Ask the vision model to describe a screenshot.
    ///
    /// Returns the raw model text; callers run it through [`slugify`]. One
    /// attempt per file, no retries.
    pub async fn describe_image(&self, path: &Path, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let data_url = image_data_url(path)?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt.to_string() },
                    ContentPart::ImageUrl { image_url: ImageUrl { url: data_url } },
                ],
            }],
            max_tokens: self.max_tokens,
        };

        debug!("Sending vision request: model={}", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ShutterError::VisionUnavailable(format!(
                "Vision API returned status {}",
                response.status()
            )));
        }

        let result: ChatResponse = response.json().await?;
        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ShutterError::VisionUnavailable(
                "Vision API returned an empty description".to_string(),
            ));
        }

        Ok(content)
    }
}

/// Encode an image as a base64 `data:` URL for the vision request.
///
/// Large images are resized and re-encoded as JPEG first; if decoding fails
/// the raw bytes go out with a MIME type from the extension.
fn image_data_url(path: &Path) -> Result<String> {
    match prepare_image(path) {
        Ok(data) => Ok(format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(&data)
        )),
        Err(_) => {
            let mime = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
                    "image/jpeg"
                }
                _ => "image/png",
            };
            let data = std::fs::read(path)?;
            Ok(format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(&data)))
        }
    }
}

/// Resize large images for faster upload
fn prepare_image(path: &Path) -> Result<Vec<u8>> {
    let img = image::open(path)?;

    // Resize if too large (max 1024px on longest side)
    let img = if img.width() > 1024 || img.height() > 1024 {
        img.resize(1024, 1024, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    img.write_to(&mut cursor, image::ImageFormat::Jpeg)?;

    Ok(buffer)
}

/// Sanitize a model description into a filesystem-safe slug.
///
/// Lowercase, ASCII alphanumerics and hyphens only, capped at `max_len`.
/// Returns an empty string for descriptions with nothing usable in them.
pub fn slugify(raw: &str, max_len: usize) -> String {
    let mut clean = raw.trim().replace(['\n', '\r'], " ");

    // Remove common chat prefixes ("Filename: ...")
    if let Some(idx) = clean.find(':') {
        if idx < 30 {
            clean = clean[idx + 1..].trim().to_string();
        }
    }

    // Remove quotes and a trailing extension the model may have added
    clean = clean.trim_matches('"').trim_matches('\'').to_string();
    if let Some(idx) = clean.find('.') {
        clean.truncate(idx);
    }

    // Map everything outside [a-z0-9] to hyphens, collapse runs
    let mut slug = String::with_capacity(clean.len());
    for c in clean.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.truncate(max_len);
    slug.trim_matches('-').to_string()
}
