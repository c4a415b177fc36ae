//! API payload models and generic record helpers

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Entity identifier as the API reports it
///
/// Clubhouse ids are numeric today, but the API treats them as opaque, so
/// string ids decode too rather than failing the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Int(n)
    }
}

/// A named tag attached to an epic
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

/// A parent grouping entity for stories
#[derive(Debug, Clone, Deserialize)]
pub struct Epic {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// A unit of work belonging to exactly one epic
#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub epic_id: EntityId,
}

/// One page of search results
///
/// `next` is an opaque server-issued continuation path; `total` is the count
/// the server reports across all pages. Both are optional in the wire format
/// and an absent `total` must stay absent, it is not the same as zero results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<Story>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// Linear first-match lookup over a sequence of JSON records.
///
/// Finds the first record whose `search_in` field equals `search_val` and
/// returns its `return_key` field. Returns `None` when the sequence is empty,
/// nothing matches, or the matched record lacks `return_key`; never errors.
pub fn search_field<'a>(
    records: &'a [Value],
    search_in: &str,
    search_val: &Value,
    return_key: &str,
) -> Option<&'a Value> {
    records
        .iter()
        .find(|record| record.get(search_in) == Some(search_val))
        .and_then(|record| record.get(return_key))
}
