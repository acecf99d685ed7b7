use crate::error::Result;
use crate::query::Filter;
use crate::types::{Document, NewDocument};
use async_trait::async_trait;
use std::sync::Arc;

/// Narrow interface to the backing document store.
///
/// Each call completes before the caller continues. Concurrent writers to the
/// same document are resolved by the store (last write wins for the bundled
/// adapters).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Records of `collection` matching `filter`, in the store's natural order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;

    /// Persist a new record and return it with its assigned id.
    async fn create(&self, collection: &str, document: NewDocument) -> Result<Document>;

    /// Persist the current field values of an existing record.
    async fn save(&self, collection: &str, document: &Document) -> Result<()>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        (**self).find(collection, filter).await
    }

    async fn create(&self, collection: &str, document: NewDocument) -> Result<Document> {
        (**self).create(collection, document).await
    }

    async fn save(&self, collection: &str, document: &Document) -> Result<()> {
        (**self).save(collection, document).await
    }
}

#[async_trait]
impl<'a, S: DocumentStore + ?Sized> DocumentStore for &'a S {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        (**self).find(collection, filter).await
    }

    async fn create(&self, collection: &str, document: NewDocument) -> Result<Document> {
        (**self).create(collection, document).await
    }

    async fn save(&self, collection: &str, document: &Document) -> Result<()> {
        (**self).save(collection, document).await
    }
}
