use crate::aggregate::{tag_frequencies, TagAggregator};
use crate::error::{Result, StoreError};
use crate::normalize::TagInput;
use crate::query::{Condition, Filter, TagMatch, TagQueryBuilder};
use crate::store::DocumentStore;
use crate::types::{Document, DocumentId, NewDocument, Scope, Tag, TagFrequency, ID_FIELD};

/// Collection-wide tag operations for one record type.
///
/// Every query runs against the records of `name` that match the
/// collection's base scope. Use [`TaggedCollection::within`] to narrow it,
/// e.g. to the records of one parent.
#[derive(Debug, Clone)]
pub struct TaggedCollection<S> {
    store: S,
    name: String,
    scope: Scope,
    query: TagQueryBuilder,
}

impl<S: DocumentStore> TaggedCollection<S> {
    pub fn new(store: S, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            scope: Scope::new(),
            query: TagQueryBuilder::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Same collection restricted further by `scope`.
    pub fn within(&self, scope: &Scope) -> Self
    where
        S: Clone,
    {
        Self {
            store: self.store.clone(),
            name: self.name.clone(),
            scope: self.scope.merged(scope),
            query: self.query.clone(),
        }
    }

    /// Every distinct tag used by a record in scope, ascending.
    pub async fn tag_list(&self) -> Result<Vec<Tag>> {
        let records = self.fetch(self.base_filter()).await?;
        let mut aggregator = TagAggregator::new();
        aggregator.extend(&records);
        Ok(aggregator.tag_names())
    }

    /// Records carrying at least one of `tags`.
    pub async fn tagged_with(&self, tags: impl Into<TagInput>) -> Result<Vec<Document>> {
        self.tagged(TagMatch::AnyOf, tags).await
    }

    /// Records carrying every one of `tags`. Empty input yields no records.
    pub async fn tagged_with_all(&self, tags: impl Into<TagInput>) -> Result<Vec<Document>> {
        self.tagged(TagMatch::AllOf, tags).await
    }

    /// Records carrying none of `tags`.
    pub async fn tagged_without(&self, tags: impl Into<TagInput>) -> Result<Vec<Document>> {
        self.tagged(TagMatch::NoneOf, tags).await
    }

    pub async fn tagged(&self, mode: TagMatch, tags: impl Into<TagInput>) -> Result<Vec<Document>> {
        let condition = self.query.build(mode, tags);
        self.fetch(self.base_filter().and(condition)).await
    }

    /// Tag frequency table over the records matching `scope`, sorted by name.
    pub async fn all_tags(&self, scope: &Scope) -> Result<Vec<TagFrequency>> {
        let filter = self.base_filter().and_filter(Filter::from_scope(scope));
        let records = self.fetch(filter).await?;
        Ok(tag_frequencies(&records))
    }

    #[deprecated(note = "use `all_tags` with a scope instead")]
    pub async fn scoped_tags(&self, scope: &Scope) -> Result<Vec<TagFrequency>> {
        self.all_tags(scope).await
    }

    /// Records matching `scope` within the collection.
    pub async fn find(&self, scope: &Scope) -> Result<Vec<Document>> {
        self.fetch(self.base_filter().and_filter(Filter::from_scope(scope)))
            .await
    }

    pub async fn get(&self, id: DocumentId) -> Result<Document> {
        let filter = self.base_filter().and(Condition::Eq {
            field: ID_FIELD.to_string(),
            value: id.0.into(),
        });
        self.fetch(filter)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound(id))
    }

    /// Create a record. Fields of the base scope are filled in when the
    /// payload leaves them unset.
    pub async fn create(&self, mut document: NewDocument) -> Result<Document> {
        for (field, value) in self.scope.iter() {
            if field != ID_FIELD && !document.fields.contains_key(field) {
                document.fields.insert(field.clone(), value.clone());
            }
        }
        let created = self.store.create(&self.name, document).await?;
        log::debug!(
            "Created {} #{} with {} tags",
            self.name,
            created.id,
            created.tags.len()
        );
        Ok(created)
    }

    pub async fn save(&self, document: &Document) -> Result<()> {
        self.store.save(&self.name, document).await
    }

    fn base_filter(&self) -> Filter {
        Filter::from_scope(&self.scope)
    }

    async fn fetch(&self, filter: Filter) -> Result<Vec<Document>> {
        if filter.is_unsatisfiable() {
            log::debug!("Skipping {} query: filter matches nothing", self.name);
            return Ok(Vec::new());
        }
        log::debug!("Querying {} with {:?}", self.name, filter.conditions);
        self.store.find(&self.name, &filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{TagSet, Taggable};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Returns canned documents and records every filter it receives.
    #[derive(Default)]
    struct RecordingStore {
        documents: Vec<Document>,
        filters: Mutex<Vec<Filter>>,
        created: Mutex<Vec<NewDocument>>,
    }

    #[async_trait]
    impl DocumentStore for RecordingStore {
        async fn find(&self, _collection: &str, filter: &Filter) -> Result<Vec<Document>> {
            self.filters.lock().unwrap().push(filter.clone());
            Ok(self.documents.clone())
        }

        async fn create(&self, _collection: &str, document: NewDocument) -> Result<Document> {
            self.created.lock().unwrap().push(document.clone());
            Ok(Document {
                id: DocumentId(1),
                fields: document.fields,
                tags: document.tags,
            })
        }

        async fn save(&self, _collection: &str, _document: &Document) -> Result<()> {
            Ok(())
        }
    }

    fn doc(id: u64, tags: &str) -> Document {
        Document {
            id: DocumentId(id),
            fields: Default::default(),
            tags: TagSet::from_input(tags),
        }
    }

    #[tokio::test]
    async fn all_of_empty_input_does_not_reach_store() {
        let store = Arc::new(RecordingStore {
            documents: vec![doc(1, "linux")],
            ..Default::default()
        });
        let users = TaggedCollection::new(store.clone(), "users");

        assert!(users.tagged_with_all(Vec::<String>::new()).await.unwrap().is_empty());
        assert!(store.filters.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn within_conjoins_scope_with_tag_condition() {
        let store = Arc::new(RecordingStore::default());
        let users = TaggedCollection::new(store.clone(), "users")
            .within(&Scope::new().with("organization_id", 1));

        users.tagged_without("linux").await.unwrap();

        let filters = store.filters.lock().unwrap();
        assert_eq!(
            filters[0].conditions,
            vec![
                Condition::Eq {
                    field: "organization_id".to_string(),
                    value: json!(1),
                },
                TagQueryBuilder::new().none_of(vec!["linux".to_string()]),
            ]
        );
    }

    #[tokio::test]
    async fn create_fills_in_scope_fields() {
        let store = Arc::new(RecordingStore::default());
        let users = TaggedCollection::new(store.clone(), "users")
            .within(&Scope::new().with("organization_id", 7));

        let created = users
            .create(NewDocument::new().with_field("name", "User1").with_tag_list("ubuntu, linux"))
            .await
            .unwrap();

        assert_eq!(created.field("organization_id"), Some(json!(7)));
        assert_eq!(created.tags(), vec!["ubuntu", "linux"]);
    }

    #[tokio::test]
    async fn tag_list_and_all_tags_aggregate_store_results() {
        let store = RecordingStore {
            documents: vec![doc(1, "linux, tucuman, free software"), doc(2, "linux")],
            ..Default::default()
        };
        let users = TaggedCollection::new(&store, "users");

        assert_eq!(
            users.tag_list().await.unwrap(),
            vec!["free software", "linux", "tucuman"]
        );
        assert_eq!(
            users.all_tags(&Scope::new()).await.unwrap(),
            vec![
                TagFrequency::new("free software", 1),
                TagFrequency::new("linux", 2),
                TagFrequency::new("tucuman", 1),
            ]
        );
    }

    #[tokio::test]
    async fn get_missing_document_is_not_found() {
        let store = RecordingStore::default();
        let users = TaggedCollection::new(&store, "users");
        let err = users.get(DocumentId(42)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(DocumentId(42))));
    }
}
