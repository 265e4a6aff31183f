// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::warn;

use crate::config::model::ProjectConfig;

/// Read and deserialize a config file. No semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {path:?}"))?;
    let config: ProjectConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {path:?}"))?;
    Ok(config)
}

/// Read, deserialize and validate a config file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Like [`load_and_validate`], but a missing file falls back to defaults.
///
/// A config file is optional for the common convention-following project;
/// a present-but-broken file is still an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "config file not found; using defaults");
        return Ok(ProjectConfig::default());
    }
    load_and_validate(path)
}

/// Semantic checks beyond what serde enforces.
pub fn validate_config(cfg: &ProjectConfig) -> Result<()> {
    if cfg.build.dest.trim().is_empty() {
        return Err(anyhow!("[build].dest must not be empty"));
    }
    if cfg.build.source.trim().is_empty() {
        return Err(anyhow!("[build].source must not be empty"));
    }
    if cfg.build.dest == cfg.build.source {
        return Err(anyhow!(
            "[build].dest must differ from [build].source (got '{}' for both)",
            cfg.build.dest
        ));
    }
    if cfg.watch.debounce_ms == 0 {
        return Err(anyhow!("[watch].debounce_ms must be >= 1 (got 0)"));
    }
    Ok(())
}
