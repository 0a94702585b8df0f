//! Document identifiers.
//!
//! `ObjectId` is the 12-byte id type of the reference database. `DocId` is the
//! canonical string key derived from a document's `_id`, used wherever ids must
//! be hashed (e.g. distance maps). Distinct `_id` values never share a key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::value::{Document, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> &[u8; 12] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::InvalidObjectId(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

/// Canonical, hashable form of a document `_id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Key for an `_id` value; `None` (no `_id`) maps to `-`.
    ///
    /// Strings are kept as-is unless they could collide with another form, in
    /// which case they are prefixed with `-`. Other scalars become `~` followed
    /// by their extended-JSON text. Embedded documents, arrays and binary ids
    /// are rejected.
    pub fn of(id: Option<&Value>) -> Result<DocId> {
        let key = match id {
            None => "-".to_string(),
            Some(Value::ObjectId(oid)) => oid.to_hex(),
            Some(Value::String(s)) => {
                if needs_escape(s) {
                    format!("-{}", s)
                } else {
                    s.clone()
                }
            }
            Some(Value::Null) => "~null".to_string(),
            Some(Value::Bool(b)) => format!("~{}", b),
            Some(Value::Number(n)) => format!("~{}", number_text(*n)),
            Some(Value::Date(ms)) => format!("~{{\"$date\":{}}}", ms),
            Some(Value::Regex { pattern, flags }) => format!(
                "~{{\"$regexp\":{},\"$flags\":{}}}",
                serde_json::Value::String(pattern.clone()),
                serde_json::Value::String(flags.clone())
            ),
            Some(other) => {
                return Err(Error::UnsupportedId(format!(
                    "{} ids are not supported",
                    other.type_name()
                )))
            }
        };
        Ok(DocId(key))
    }

    pub fn from_document(doc: &Document) -> Result<DocId> {
        Self::of(doc.id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ObjectId> for DocId {
    fn from(oid: ObjectId) -> Self {
        DocId(oid.to_hex())
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        if needs_escape(s) {
            DocId(format!("-{}", s))
        } else {
            DocId(s.to_string())
        }
    }
}

fn needs_escape(s: &str) -> bool {
    match s.chars().next() {
        None => false,
        Some('-' | '~' | '{') => true,
        Some(_) => looks_like_object_id(s),
    }
}

fn looks_like_object_id(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn number_text(n: f64) -> String {
    if n.is_nan() {
        "{\"$InfNaN\":0}".to_string()
    } else if n.is_infinite() {
        format!("{{\"$InfNaN\":{}}}", if n > 0.0 { 1 } else { -1 })
    } else if n == 0.0 {
        // -0 and 0 are the same id.
        "0".to_string()
    } else {
        format!("{}", n)
    }
}
