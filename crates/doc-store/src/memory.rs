use crate::eval::matches;
use async_trait::async_trait;
use std::collections::BTreeMap;
use taggable_core::{
    Document, DocumentId, DocumentStore, Filter, NewDocument, Result, StoreError,
};
use tokio::sync::RwLock;

/// Documents of every collection, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StoreState {
    pub(crate) next_id: u64,
    pub(crate) collections: BTreeMap<String, Vec<Document>>,
}

impl StoreState {
    pub(crate) fn find(&self, collection: &str, filter: &Filter) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches(document, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn create(&mut self, collection: &str, document: NewDocument) -> Document {
        self.next_id += 1;
        let created = Document {
            id: DocumentId(self.next_id),
            fields: document.fields,
            tags: document.tags,
        };
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(created.clone());
        created
    }

    /// Replace the stored copy; last write wins.
    pub(crate) fn save(&mut self, collection: &str, document: &Document) -> Result<()> {
        let stored = self
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|d| d.id == document.id))
            .ok_or(StoreError::NotFound(document.id))?;
        *stored = document.clone();
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

/// Volatile store; contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of documents across collections.
    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        Ok(self.state.read().await.find(collection, filter))
    }

    async fn create(&self, collection: &str, document: NewDocument) -> Result<Document> {
        Ok(self.state.write().await.create(collection, document))
    }

    async fn save(&self, collection: &str, document: &Document) -> Result<()> {
        self.state.write().await.save(collection, document)
    }
}
