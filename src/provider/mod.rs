use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::ModelId;
use crate::config::{ApiKey, Config};

pub mod gemini;

/// Opaque text-completion capability: one prompt in, generated text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, model: ModelId, prompt: &str) -> Result<String>;
}

pub type DynClient = Arc<dyn CompletionClient>;

pub fn make_client(cfg: &Config, key: ApiKey) -> Result<DynClient> {
    let client = gemini::GeminiClient::new(
        key,
        cfg.api_base.clone(),
        Duration::from_secs(cfg.timeout_secs),
    )?;
    Ok(Arc::new(client))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum Outcome {
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
    pub outcome: Outcome,
    pub model: ModelId,
    pub timestamp: DateTime<Utc>,
}

impl CompletionResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded(_))
    }

    /// Generated text on success, the failure message otherwise.
    pub fn text(&self) -> &str {
        match &self.outcome {
            Outcome::Succeeded(t) | Outcome::Failed(t) => t,
        }
    }

    pub fn into_text(self) -> String {
        match self.outcome {
            Outcome::Succeeded(t) | Outcome::Failed(t) => t,
        }
    }
}

pub fn failure_message(err: &anyhow::Error) -> String {
    format!(
        "Error interacting with the completion API: {err:#}. This could be due to network issues, an invalid API key, or content safety policies."
    )
}

/// Issue one completion call; every failure is folded into the result text.
pub async fn complete(client: &dyn CompletionClient, prompt: &str, model: ModelId) -> CompletionResult {
    let outcome = if prompt.trim().is_empty() {
        tracing::warn!(%model, "refusing to send an empty prompt");
        Outcome::Failed("Cannot request a completion for an empty prompt.".to_string())
    } else {
        tracing::debug!(%model, prompt_chars = prompt.chars().count(), "sending completion request");
        match client.generate(model, prompt).await {
            Ok(text) => Outcome::Succeeded(text),
            Err(e) => {
                let detail = format!("{e:#}");
                tracing::error!(%model, error = %detail, "completion call failed");
                Outcome::Failed(failure_message(&e))
            }
        }
    };
    CompletionResult { outcome, model, timestamp: Utc::now() }
}
