//! Core data models used throughout Movie Finder.
//!
//! These types represent the movie records kept in the local store and the
//! transient search candidates shown to the user during disambiguation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder stored for any scalar field that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum number of cast names kept on a record.
pub const MAX_CAST: usize = 10;

/// A structured movie entry as persisted in the record store.
///
/// Scalars that could not be resolved hold [`NOT_AVAILABLE`]; list fields
/// that could not be resolved are empty. Neither is ever absent, so
/// rendering code never branches on presence. Field order here is the
/// field order in the persisted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default = "not_available", deserialize_with = "scalar_or_na")]
    pub title: String,
    #[serde(default = "not_available", deserialize_with = "scalar_or_na")]
    pub year: String,
    #[serde(default = "not_available", deserialize_with = "scalar_or_na")]
    pub rating: String,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub directors: Vec<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub writers: Vec<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub cast: Vec<String>,
    #[serde(default = "not_available", deserialize_with = "scalar_or_na")]
    pub certificate: String,
    #[serde(default = "not_available", deserialize_with = "scalar_or_na")]
    pub description: String,
}

impl MovieRecord {
    /// A record with only a title; every other field holds its sentinel.
    pub fn untitled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: not_available(),
            rating: not_available(),
            genres: Vec::new(),
            directors: Vec::new(),
            writers: Vec::new(),
            cast: Vec::new(),
            certificate: not_available(),
            description: not_available(),
        }
    }

    /// Case-insensitive comparison of the record's `title` against a query.
    pub fn title_matches(&self, query: &str) -> bool {
        self.title.to_lowercase() == query.to_lowercase()
    }
}

/// One ranked search result offered to the user for selection.
///
/// Candidates live only for the duration of a single lookup and are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// 1-based position in result order; the key the user selects by.
    pub rank: u32,
    /// Visible title text of the result link.
    pub title: String,
    /// Year taken from the trailing parenthesis group, or `"N/A"`.
    pub year: String,
    /// Absolute URL of the detail page.
    pub locator: String,
    /// Title identifier parsed out of the locator path (`tt…`), if any.
    pub id: Option<String>,
}

pub(crate) fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Scalar field: strings as-is, numbers as their text, anything else
/// (null, bool, array, object) as [`NOT_AVAILABLE`].
fn scalar_or_na<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => not_available(),
    })
}

/// List field: string and number items of an array; anything that is not
/// an array is an empty list.
fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
