use crate::normalize::TagInput;
use crate::types::{Document, NewDocument, Tag};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Separator used when rendering the delimited tag view.
pub const TAG_LIST_SEPARATOR: &str = ", ";

/// Ordered tags attached to one record.
///
/// Holds only trimmed, non-empty values. A stored `null` reads back as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_input(input: impl Into<TagInput>) -> Self {
        Self(input.into().normalize())
    }

    /// Replace the contents with the normalized form of `input`.
    pub fn replace(&mut self, input: impl Into<TagInput>) {
        self.0 = input.into().normalize();
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Tag> {
        self.0.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Delimited view, e.g. `"linux, tucuman"`.
    pub fn to_delimited(&self) -> String {
        self.0.join(TAG_LIST_SEPARATOR)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_delimited())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(Self::from_input(raw))
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<TagSet> for Vec<Tag> {
    fn from(set: TagSet) -> Self {
        set.0
    }
}

/// Tag facet for a host record that embeds a [`TagSet`].
///
/// Hosts only expose their tag field; both setters run the same
/// normalization, so `set_tags` and `set_tag_list` are interchangeable.
pub trait Taggable {
    fn tag_set(&self) -> &TagSet;

    fn tag_set_mut(&mut self) -> &mut TagSet;

    /// Stored tags. Never nil: an unset field reads as empty.
    fn tags(&self) -> Vec<Tag> {
        self.tag_set().to_vec()
    }

    fn set_tags(&mut self, value: impl Into<TagInput>)
    where
        Self: Sized,
    {
        self.tag_set_mut().replace(value);
    }

    /// Tags joined with `", "`.
    fn tag_list(&self) -> String {
        self.tag_set().to_delimited()
    }

    fn set_tag_list(&mut self, value: impl Into<TagInput>)
    where
        Self: Sized,
    {
        self.set_tags(value);
    }
}

impl Taggable for TagSet {
    fn tag_set(&self) -> &TagSet {
        self
    }

    fn tag_set_mut(&mut self) -> &mut TagSet {
        self
    }
}

impl Taggable for Document {
    fn tag_set(&self) -> &TagSet {
        &self.tags
    }

    fn tag_set_mut(&mut self) -> &mut TagSet {
        &mut self.tags
    }
}

impl Taggable for NewDocument {
    fn tag_set(&self) -> &TagSet {
        &self.tags
    }

    fn tag_set_mut(&mut self) -> &mut TagSet {
        &mut self.tags
    }
}
