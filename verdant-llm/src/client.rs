use std::env;
use std::time::Duration;

use anyhow::Context as _;
use serde_json::Value;
use tracing::debug;

use verdant_database::model::entry::Category;

use crate::{extract, prompt};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings for the generative-text provider, resolved once at
/// startup and passed in explicitly.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Read provider settings from the environment. Returns `None` when
    /// `GEMINI_API_KEY` is unset or blank, in which case the service runs
    /// without feedback generation.
    pub fn from_env_optional() -> Option<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())?;

        let base_url = env::var("GEMINI_BASE_URL")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let model = env::var("GEMINI_MODEL")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let timeout_seconds = env::var("GEMINI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Some(Self {
            base_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

/// Client for the generative-text provider.
#[derive(Clone, Debug)]
pub struct LlmService {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmService {
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build the provider http client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Request advisory feedback for one entry. A single attempt, no retry;
    /// the caller decides what a failure means.
    pub async fn generate_feedback(
        &self,
        category: Category,
        entry_text: &str,
    ) -> anyhow::Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt::feedback_prompt(category, entry_text) }] }]
        });

        debug!(%category, model = %self.model, "requesting feedback from provider");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("failed to reach the feedback provider")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("feedback provider returned {status}: {detail}");
        }

        let payload: Value = response
            .json()
            .await
            .context("failed to decode the provider response body")?;

        extract::feedback_text(&payload)
            .ok_or_else(|| anyhow::anyhow!("provider response contained no usable text"))
    }
}
