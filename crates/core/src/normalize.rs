use crate::types::Tag;

/// Separator accepted by the delimited tag view.
pub const TAG_DELIMITER: char = ',';

/// Raw tag input as callers hand it over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagInput {
    /// No value; normalizes to an empty tag sequence.
    #[default]
    Nil,

    /// Comma separated string, e.g. `"linux, tucuman, free software"`.
    Delimited(String),

    /// Already split values, trimmed one by one.
    List(Vec<String>),
}

impl TagInput {
    /// Normalize into an ordered tag sequence.
    ///
    /// Tokens are trimmed and empty tokens dropped. Relative order is kept and
    /// duplicates are left in place.
    pub fn normalize(self) -> Vec<Tag> {
        match self {
            TagInput::Nil => Vec::new(),
            TagInput::Delimited(raw) => raw.split(TAG_DELIMITER).filter_map(clean).collect(),
            TagInput::List(values) => values.iter().filter_map(|v| clean(v)).collect(),
        }
    }

    /// Tags to match in a query. A string is one tag, never split, so tags
    /// stored with a comma inside stay reachable.
    pub fn into_query_tags(self) -> Vec<Tag> {
        match self {
            TagInput::Delimited(raw) => clean(&raw).into_iter().collect(),
            other => other.normalize(),
        }
    }
}

fn clean(token: &str) -> Option<Tag> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Shorthand for `TagInput::from(input).normalize()`.
pub fn normalize_tags(input: impl Into<TagInput>) -> Vec<Tag> {
    input.into().normalize()
}

impl From<&str> for TagInput {
    fn from(value: &str) -> Self {
        TagInput::Delimited(value.to_string())
    }
}

impl From<String> for TagInput {
    fn from(value: String) -> Self {
        TagInput::Delimited(value)
    }
}

impl From<&String> for TagInput {
    fn from(value: &String) -> Self {
        TagInput::Delimited(value.clone())
    }
}

impl From<Vec<String>> for TagInput {
    fn from(values: Vec<String>) -> Self {
        TagInput::List(values)
    }
}

impl From<Vec<&str>> for TagInput {
    fn from(values: Vec<&str>) -> Self {
        TagInput::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TagInput {
    fn from(values: &[&str]) -> Self {
        TagInput::List(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TagInput {
    fn from(values: [&str; N]) -> Self {
        TagInput::List(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl From<&[String]> for TagInput {
    fn from(values: &[String]) -> Self {
        TagInput::List(values.to_vec())
    }
}

impl<T: Into<TagInput>> From<Option<T>> for TagInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(TagInput::Nil, Into::into)
    }
}
