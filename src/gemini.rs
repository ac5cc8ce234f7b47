//! Generative-text client.
//!
//! [`TextGenerator`] is the seam the recommendation bridge talks to;
//! [`GeminiClient`] is the production implementation backed by the Gemini
//! `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::{Res, config::Config, error::Error};

/// Single-shot prompt completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Res<String>;
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String, client: Client) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client,
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_api_url.clone(),
            client,
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Res<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        candidate_text(&resp)
            .ok_or_else(|| Error::Upstream("Gemini response contained no text".into()))
    }
}

/// Concatenated text parts of the first candidate.
fn candidate_text(resp: &Value) -> Option<String> {
    let parts = resp["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();

    (!text.is_empty()).then_some(text)
}
