use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::catalog::ModelId;
use crate::config::ApiKey;
use crate::wire::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Gemini `generateContent` adapter. One POST per prompt, no retries.
pub struct GeminiClient {
    client: Client,
    api_key: ApiKey,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: ApiKey, api_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, api_key, api_base })
    }

    fn endpoint(&self, model: ModelId) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model.as_str()
        )
    }
}

#[async_trait]
impl super::CompletionClient for GeminiClient {
    async fn generate(&self, model: ModelId, prompt: &str) -> Result<String> {
        let url = self.endpoint(model);
        tracing::debug!(%url, "POST generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&GenerateContentRequest::user_text(prompt))
            .send()
            .await
            .with_context(|| format!("request to {model} failed"))?;

        let status = resp.status();
        let text = resp.text().await.context("reading response body")?;
        tracing::debug!(%status, bytes = text.len(), "generateContent responded");

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|e| match e.error.status {
                    Some(s) => format!("{s}: {}", e.error.message),
                    None => e.error.message,
                })
                .unwrap_or(text);
            return Err(anyhow!("Gemini API error ({status}): {detail}"));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("failed to parse Gemini response: {e}"))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(anyhow!("prompt was blocked by the service (reason: {reason})"));
        }

        parsed.text().ok_or_else(|| {
            anyhow!(
                "model returned no text (finish reason: {})",
                parsed.finish_reason().unwrap_or("unknown")
            )
        })
    }
}
