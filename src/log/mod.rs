use fs_err as fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::provider::CompletionResult;

/// Install the stderr subscriber. `RUST_LOG` wins over `debug`.
pub fn init(debug: bool) {
    let fallback = if debug { "prd_forge=debug" } else { "prd_forge=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

/// Per-run capture of prompts and responses under `<state_dir>/tx/<uuid>/`.
#[derive(Debug, Clone)]
pub struct Artifacts {
    dir: PathBuf,
}

impl Artifacts {
    pub fn new(state_dir: &Path, tx: Uuid) -> Self {
        Self { dir: tx_dir(state_dir, tx) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Best-effort; a failed write is logged and otherwise ignored.
    pub fn save_stage(&self, stage: &str, prompt: &str, result: &CompletionResult) {
        if let Err(e) = self.write_stage(stage, prompt, result) {
            tracing::warn!(stage, error = %format!("{e:#}"), "could not save artifacts");
        }
    }

    fn write_stage(&self, stage: &str, prompt: &str, result: &CompletionResult) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let prompt_path = self.dir.join(format!("{stage}.prompt.md"));
        let response_path = self.dir.join(format!("{stage}.response.json"));
        fs::write(&prompt_path, prompt)?;
        fs::write(&response_path, serde_json::to_string_pretty(result)?)?;
        tracing::debug!(stage, prompt = %prompt_path.display(), response = %response_path.display(), "artifacts saved");
        Ok(())
    }
}
