use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use taggable_doc_store::{StoreBackend, StoreConfig, DEFAULT_STORE_PATH};

pub const BACKEND_ENV: &str = "TAGGABLE_BACKEND";
pub const STORE_ENV: &str = "TAGGABLE_STORE";
pub const COLLECTION_ENV: &str = "TAGGABLE_COLLECTION";
pub const DEFAULT_COLLECTION: &str = "records";

/// Optional settings file, JSON or TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub backend: Option<String>,
    pub store: Option<PathBuf>,
    pub collection: Option<String>,
}

/// Values given on the command line, before any fallback.
#[derive(Debug, Default, Clone)]
pub struct SettingsFlags {
    pub backend: Option<String>,
    pub store: Option<PathBuf>,
    pub collection: Option<String>,
    pub config: Option<PathBuf>,
}

/// Effective settings after flags, environment and settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreConfig,
    pub collection: String,
}

impl Settings {
    /// Flags win over environment, environment over the settings file.
    pub fn resolve(flags: SettingsFlags) -> Result<Self> {
        Self::resolve_with(flags, env_non_empty)
    }

    /// Same as [`Settings::resolve`] with `env` standing in for the process
    /// environment.
    pub fn resolve_with(flags: SettingsFlags, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = match flags.config.as_deref() {
            Some(path) => load_file_settings(path)?,
            None => FileSettings::default(),
        };

        let backend = match flags.backend.or_else(|| env(BACKEND_ENV)).or(file.backend) {
            Some(raw) => parse_store_backend(&raw)?,
            None => StoreBackend::File,
        };
        let path = flags
            .store
            .or_else(|| env(STORE_ENV).map(PathBuf::from))
            .or(file.store)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
        let collection = flags
            .collection
            .or_else(|| env(COLLECTION_ENV))
            .or(file.collection)
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        if collection.trim().is_empty() {
            return Err(anyhow!("Collection name must not be empty"));
        }

        let store = match backend {
            StoreBackend::File => StoreConfig::file(path),
            StoreBackend::Memory => StoreConfig::memory(),
        };
        Ok(Self { store, collection })
    }
}

fn parse_store_backend(value: &str) -> Result<StoreBackend> {
    match value.trim().to_lowercase().as_str() {
        "file" => Ok(StoreBackend::File),
        "memory" => Ok(StoreBackend::Memory),
        other => anyhow::bail!("Unsupported store backend: {other}"),
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn load_file_settings(path: &Path) -> Result<FileSettings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read settings file {}", path.display()))?;
    parse_file_settings(&raw).with_context(|| format!("Invalid settings file {}", path.display()))
}

fn parse_file_settings(raw: &str) -> Result<FileSettings> {
    match serde_json::from_str::<FileSettings>(raw) {
        Ok(settings) => Ok(settings),
        Err(json_err) => toml::from_str(raw).map_err(|toml_err| {
            anyhow!("Settings are not valid JSON ({json_err}) or TOML ({toml_err})")
        }),
    }
}
