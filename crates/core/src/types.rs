use crate::record::TagSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A normalized tag: trimmed, non-empty, case preserved.
pub type Tag = String;

/// Name of the field holding a record's tags.
pub const TAGS_FIELD: &str = "tags";

/// Scope key addressing the store-assigned document id.
pub const ID_FIELD: &str = "id";

/// Store-assigned document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generic host record as held by a document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,

    /// Declared fields other than tags (names, foreign keys, ...)
    #[serde(default)]
    pub fields: Map<String, Value>,

    #[serde(default)]
    pub tags: TagSet,
}

impl Document {
    /// Look up a field by name. `id` resolves to the document id.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == ID_FIELD {
            return Some(Value::from(self.id.0));
        }
        self.fields.get(name).cloned()
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }
}

/// Payload for creating a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    #[serde(default)]
    pub fields: Map<String, Value>,

    #[serde(default)]
    pub tags: TagSet,
}

impl NewDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Tags from a delimited string or a list, normalized on the way in.
    pub fn with_tag_list(mut self, tags: impl Into<crate::TagInput>) -> Self {
        self.tags = TagSet::from_input(tags);
        self
    }
}

/// One row of a tag frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagFrequency {
    pub name: Tag,

    /// Number of records carrying the tag
    pub count: usize,
}

impl TagFrequency {
    pub fn new(name: impl Into<Tag>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Exact-match restriction on record fields.
///
/// Every entry must match for a record to be in scope; the empty scope
/// matches all records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(BTreeMap<String, Value>);

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Combine two scopes; entries of `other` win on conflicting keys.
    pub fn merged(&self, other: &Scope) -> Scope {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Scope(merged)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Scope(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
