use crate::file::JsonFileStore;
use crate::memory::MemoryStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use taggable_core::{DocumentStore, Result};

pub const DEFAULT_STORE_PATH: &str = ".taggable/store.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    File,
}

/// Which store to open and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Store file, used by the file backend only
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file(DEFAULT_STORE_PATH)
    }
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: PathBuf::new(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::File,
            path: path.into(),
        }
    }

    pub async fn open(&self) -> Result<Arc<dyn DocumentStore>> {
        match self.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreBackend::File => Ok(Arc::new(JsonFileStore::open(&self.path).await?)),
        }
    }
}
