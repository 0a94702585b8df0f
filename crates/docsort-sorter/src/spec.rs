//! Sort specification shapes and their normalisation into ordered parts.
//!
//! Accepted shapes:
//! ```text
//! {"a": 1, "b": -1}            mapping: weight >= 0 is ascending
//! ["a", ["b", "desc"]]         list: bare path, or [path, direction]
//! [["a", "asc"], ["b", "desc"]]
//! ```
//! In the mapping shape the order of the mapping's entries is the key
//! precedence. Callers that build specs from unordered maps should use the
//! list shape when precedence matters; entries are never re-sorted here.

use serde::{Deserialize, Deserializer};
use serde_json::Value as Json;

use crate::error::{Result, SortError};

/// One entry of the list shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// Ascending on the path.
    Path(String),
    /// `(path, direction)`: descending only when direction is `"desc"`.
    Directed(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortSpec {
    Fields(Vec<(String, f64)>),
    List(Vec<SortKey>),
}

/// A compiled `(path, direction)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPart {
    pub path: String,
    pub ascending: bool,
}

impl SortSpec {
    pub fn asc(path: impl Into<String>) -> Self {
        SortSpec::List(vec![SortKey::Path(path.into())])
    }

    pub fn desc(path: impl Into<String>) -> Self {
        SortSpec::List(vec![SortKey::Directed(path.into(), "desc".into())])
    }

    pub fn then_asc(self, path: impl Into<String>) -> Self {
        match self {
            SortSpec::Fields(mut fields) => {
                fields.push((path.into(), 1.0));
                SortSpec::Fields(fields)
            }
            SortSpec::List(mut keys) => {
                keys.push(SortKey::Path(path.into()));
                SortSpec::List(keys)
            }
        }
    }

    pub fn then_desc(self, path: impl Into<String>) -> Self {
        match self {
            SortSpec::Fields(mut fields) => {
                fields.push((path.into(), -1.0));
                SortSpec::Fields(fields)
            }
            SortSpec::List(mut keys) => {
                keys.push(SortKey::Directed(path.into(), "desc".into()));
                SortSpec::List(keys)
            }
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let json: Json = serde_json::from_str(s)
            .map_err(|e| SortError::InvalidSpec(format!("not valid JSON: {}", e)))?;
        SortSpec::try_from(&json)
    }

    /// Normalise to ordered parts, validating every path.
    pub fn normalize(&self) -> Result<Vec<SortPart>> {
        let parts: Vec<SortPart> = match self {
            SortSpec::Fields(fields) => fields
                .iter()
                .map(|(path, weight)| SortPart {
                    path: path.clone(),
                    ascending: *weight >= 0.0,
                })
                .collect(),
            SortSpec::List(keys) => keys
                .iter()
                .map(|key| match key {
                    SortKey::Path(path) => SortPart {
                        path: path.clone(),
                        ascending: true,
                    },
                    SortKey::Directed(path, direction) => SortPart {
                        path: path.clone(),
                        ascending: direction != "desc",
                    },
                })
                .collect(),
        };

        for part in &parts {
            validate_path(&part.path)?;
        }
        Ok(parts)
    }
}

fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SortError::InvalidSpec("sort keys must be non-empty".into()));
    }
    if path.starts_with('$') {
        return Err(SortError::InvalidSpec(format!(
            "unsupported sort key: {}",
            path
        )));
    }
    Ok(())
}

impl TryFrom<&Json> for SortSpec {
    type Error = SortError;

    fn try_from(json: &Json) -> Result<Self> {
        match json {
            Json::Object(map) => map
                .iter()
                .map(|(path, weight)| match weight.as_f64() {
                    Some(w) => Ok((path.clone(), w)),
                    None => Err(SortError::InvalidSpec(format!(
                        "sort weight for '{}' must be a number, got {}",
                        path, weight
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(SortSpec::Fields),
            Json::Array(items) => items
                .iter()
                .map(sort_key_from_json)
                .collect::<Result<Vec<_>>>()
                .map(SortSpec::List),
            other => Err(SortError::InvalidSpec(format!(
                "bad sort specification: {}",
                other
            ))),
        }
    }
}

fn sort_key_from_json(item: &Json) -> Result<SortKey> {
    match item {
        Json::String(path) => Ok(SortKey::Path(path.clone())),
        Json::Array(pair) => match pair.as_slice() {
            [Json::String(path), Json::String(direction)] => {
                Ok(SortKey::Directed(path.clone(), direction.clone()))
            }
            [Json::String(path), direction] => {
                Ok(SortKey::Directed(path.clone(), direction.to_string()))
            }
            _ => Err(SortError::InvalidSpec(format!(
                "sort pair must be [path, direction], got {}",
                item
            ))),
        },
        other => Err(SortError::InvalidSpec(format!(
            "bad sort key: {}",
            other
        ))),
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        SortSpec::try_from(&json).map_err(serde::de::Error::custom)
    }
}
