use anyhow::Result;
use chrono::Utc;
use fs_err as fs;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// `analysis-<unix millis>.<ext>` in the working directory.
pub fn default_file_name(ext: &str) -> PathBuf {
    PathBuf::from(format!("analysis-{}.{ext}", Utc::now().timestamp_millis()))
}

pub fn export_markdown(report: &str, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(|| default_file_name("md"));
    ensure_parent(&path)?;
    fs::write(&path, report)?;
    tracing::info!(path = %path.display(), "markdown exported");
    Ok(path)
}

pub fn export_json<T: Serialize>(data: &T, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(|| default_file_name("json"));
    ensure_parent(&path)?;
    fs::write(&path, serde_json::to_string_pretty(data)?)?;
    tracing::info!(path = %path.display(), "json exported");
    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
