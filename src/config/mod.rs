use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::{AnalysisDepth, Industry, ModelId};
use crate::errors::{PrdError, PrdResult};

pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub default_model: ModelId,
    pub default_industry: Industry,
    pub default_depth: AnalysisDepth,
    pub timeout_secs: u64,
    pub state_dir: String,
    pub history_db: Option<String>,
    pub scaffold_model: ModelId,
    pub scaffold_budget: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com".into(),
            default_model: ModelId::Gemini25Flash,
            default_industry: Industry::Generic,
            default_depth: AnalysisDepth::Standard,
            timeout_secs: 300,
            state_dir: ".prd".into(),
            history_db: None,
            scaffold_model: ModelId::Gemini25Pro,
            scaffold_budget: 8_000,
        }
    }
}

impl Config {
    /// Defaults, overlaid by the optional TOML file, overlaid by the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(p) => {
                let raw = fs::read_to_string(p)?;
                toml::from_str(&raw).with_context(|| format!("parsing config file {}", p.display()))?
            }
            None => Config::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> PrdResult<()> {
        if let Some(base) = lookup("PRD_API_BASE") {
            self.api_base = base;
        }
        if let Some(raw) = lookup("PRD_TIMEOUT_SECS") {
            self.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| PrdError::Config(format!("PRD_TIMEOUT_SECS is not a number: {raw}")))?;
        }
        if let Some(dir) = lookup("PRD_STATE_DIR") {
            self.state_dir = dir;
        }
        Ok(())
    }

    pub fn history_path(&self) -> PathBuf {
        match &self.history_db {
            Some(p) => PathBuf::from(p),
            None => Path::new(&self.state_dir).join("history.sqlite3"),
        }
    }
}

/// Completion API credential. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_env() -> PrdResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PrdResult<Self> {
        API_KEY_VARS
            .iter()
            .filter_map(|k| lookup(k))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
            .map(ApiKey)
            .ok_or_else(|| {
                PrdError::Config(format!("{} environment variable not set", API_KEY_VARS.join(" or ")))
            })
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
