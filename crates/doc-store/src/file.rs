use crate::memory::StoreState;
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use taggable_core::{Document, DocumentStore, Filter, NewDocument, Result, StoreError};
use tokio::sync::Mutex;

pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedStore {
    schema_version: u32,
    next_id: u64,
    collections: BTreeMap<String, Vec<Document>>,
}

/// Document store persisted as one JSON file.
///
/// The file is the source of truth: every operation reloads it under an
/// `fs2` lock on a sibling `.lock` file (shared for reads, exclusive for
/// writes), so several processes can share one store. Writes go through a
/// temp file and rename, so readers never observe a half-written store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    state: Mutex<StoreState>,
}

struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = lock_path_for(&path);
        let _lock = acquire_lock(&lock_path, false).await?;
        let state = load_or_empty(&path).await?;
        Ok(Self {
            path,
            lock_path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document count as of the last operation on this handle.
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Reload under an exclusive lock, apply `change`, persist.
    async fn write<T>(&self, change: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut cached = self.state.lock().await;
        let _lock = acquire_lock(&self.lock_path, true).await?;
        let mut state = load_or_empty(&self.path).await?;
        let out = change(&mut state)?;
        persist(&self.path, &state).await?;
        *cached = state;
        Ok(out)
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

async fn acquire_lock(lock_path: &Path, exclusive: bool) -> Result<StoreLock> {
    if let Some(parent) = lock_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let lock_path = lock_path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<StoreLock> {
        use std::fs::OpenOptions;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        if exclusive {
            file.lock_exclusive()?;
        } else {
            file.lock_shared()?;
        }
        Ok(StoreLock { file })
    })
    .await
    .map_err(|err| StoreError::other(format!("join store lock task: {err}")))?
}

async fn load_or_empty(path: &Path) -> Result<StoreState> {
    if tokio::fs::try_exists(path).await? {
        load_state(path).await
    } else {
        log::debug!("No store at {}, starting empty", path.display());
        Ok(StoreState::default())
    }
}

async fn load_state(path: &Path) -> Result<StoreState> {
    let bytes = tokio::fs::read(path).await?;
    let persisted: PersistedStore = serde_json::from_slice(&bytes)?;
    if persisted.schema_version != STORE_SCHEMA_VERSION {
        return Err(StoreError::SchemaVersion {
            found: persisted.schema_version,
            expected: STORE_SCHEMA_VERSION,
        });
    }
    let state = StoreState {
        next_id: persisted.next_id,
        collections: persisted.collections,
    };
    log::debug!("Loaded {} documents from {}", state.len(), path.display());
    Ok(state)
}

async fn persist(path: &Path, state: &StoreState) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let persisted = PersistedStore {
        schema_version: STORE_SCHEMA_VERSION,
        next_id: state.next_id,
        collections: state.collections.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&persisted)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    log::debug!("Saved store to {}", path.display());
    Ok(())
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let mut cached = self.state.lock().await;
        let _lock = acquire_lock(&self.lock_path, false).await?;
        *cached = load_or_empty(&self.path).await?;
        Ok(cached.find(collection, filter))
    }

    async fn create(&self, collection: &str, document: NewDocument) -> Result<Document> {
        self.write(|state| Ok(state.create(collection, document)))
            .await
    }

    async fn save(&self, collection: &str, document: &Document) -> Result<()> {
        self.write(|state| state.save(collection, document)).await
    }
}
