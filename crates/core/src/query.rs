//! Store-agnostic filter predicates.
//!
//! A [`Filter`] is a conjunction of [`Condition`]s. Adapters translate it into
//! their own query syntax (or evaluate it directly); nothing here knows how a
//! store executes it.

use crate::normalize::TagInput;
use crate::types::{Scope, Tag, TAGS_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single predicate over a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Condition {
    /// Field equals value exactly.
    Eq { field: String, value: Value },

    /// Array field shares at least one element with `values`.
    ContainsAny { field: String, values: Vec<Value> },

    /// Array field holds every element of `values`.
    ContainsAll { field: String, values: Vec<Value> },

    Not { condition: Box<Condition> },

    /// Matches no record.
    Nothing,
}

impl Condition {
    pub fn negate(self) -> Self {
        Condition::Not {
            condition: Box::new(self),
        }
    }
}

/// Conjunction of conditions; the empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn nothing() -> Self {
        Self {
            conditions: vec![Condition::Nothing],
        }
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Conjoin every condition of `other`.
    pub fn and_filter(mut self, other: Filter) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    /// Exact-match filter built from a scope, one `Eq` per entry.
    pub fn from_scope(scope: &Scope) -> Self {
        Self {
            conditions: scope
                .iter()
                .map(|(field, value)| Condition::Eq {
                    field: field.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    /// True when evaluation can be skipped because nothing can match.
    pub fn is_unsatisfiable(&self) -> bool {
        self.conditions.iter().any(|c| matches!(c, Condition::Nothing))
    }
}

/// Which of the three matching semantics to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatch {
    /// Record has at least one of the tags.
    AnyOf,

    /// Record has every one of the tags.
    AllOf,

    /// Record has none of the tags.
    NoneOf,
}

/// Builds tag-field predicates for the three matching semantics.
#[derive(Debug, Clone)]
pub struct TagQueryBuilder {
    field: String,
}

impl Default for TagQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TagQueryBuilder {
    pub fn new() -> Self {
        Self::for_field(TAGS_FIELD)
    }

    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Condition for `mode`. A string argument is one tag; pass a list to
    /// match several.
    pub fn build(&self, mode: TagMatch, tags: impl Into<TagInput>) -> Condition {
        let tags = tags.into().into_query_tags();
        match mode {
            TagMatch::AnyOf => self.any_of(tags),
            TagMatch::AllOf => self.all_of(tags),
            TagMatch::NoneOf => self.none_of(tags),
        }
    }

    pub fn any_of(&self, tags: Vec<Tag>) -> Condition {
        Condition::ContainsAny {
            field: self.field.clone(),
            values: to_values(tags),
        }
    }

    /// Superset match. An empty tag list matches nothing rather than
    /// everything.
    pub fn all_of(&self, tags: Vec<Tag>) -> Condition {
        if tags.is_empty() {
            return Condition::Nothing;
        }
        Condition::ContainsAll {
            field: self.field.clone(),
            values: to_values(tags),
        }
    }

    pub fn none_of(&self, tags: Vec<Tag>) -> Condition {
        self.any_of(tags).negate()
    }
}

fn to_values(tags: Vec<Tag>) -> Vec<Value> {
    tags.into_iter().map(Value::String).collect()
}
