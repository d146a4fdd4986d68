use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::PathBuf};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub model_path: PathBuf,
    pub preprocessor_path: PathBuf,
    pub dataset_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            model_path: PathBuf::from("artifacts/housepred.json"),
            preprocessor_path: PathBuf::from("artifacts/preprocessor.json"),
            dataset_path: PathBuf::from("dataset/HouseIndia.csv"),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing keys fall back to the defaults.
    pub fn load(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("config file not found at {}", path))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {}", path))
    }

    /// `CONFIG_PATH` if set, otherwise individual env vars over the defaults.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = std::env::var("CONFIG_PATH") {
            return Self::load(&path);
        }
        Ok(Self::from_vars(|key| std::env::var(key).ok()))
    }

    /// Build from an arbitrary variable lookup. `BIND_ADDR` beats `PORT`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(addr) = var("BIND_ADDR") {
            cfg.bind_addr = addr;
        } else if let Some(port) = var("PORT").and_then(|s| s.parse::<u16>().ok()) {
            cfg.bind_addr = format!("0.0.0.0:{}", port);
        }
        if let Some(p) = var("MODEL_PATH") {
            cfg.model_path = p.into();
        }
        if let Some(p) = var("PREPROCESSOR_PATH") {
            cfg.preprocessor_path = p.into();
        }
        if let Some(p) = var("DATASET_PATH") {
            cfg.dataset_path = p.into();
        }
        cfg
    }
}

/// Relative artifact paths are tried against the working directory first,
/// then next to the executable. Falls back to the path as given so the
/// loader reports the original location.
pub fn resolve_asset_path(path: &std::path::Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }

    let mut beside_exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
    beside_exe.pop(); // exe dir
    beside_exe.push(path);
    if beside_exe.exists() {
        return beside_exe;
    }

    path.to_path_buf()
}
