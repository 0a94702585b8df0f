//! Schema-less document values.
//!
//! `Value` covers every type the ordering rules in [`crate::order`] know
//! about. Documents keep their fields in insertion order because embedded
//! documents compare field by field in that order.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::ObjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Number(f64),
    String(String),
    Document(Document),
    Array(Vec<Value>),
    Binary(Vec<u8>),
    ObjectId(ObjectId),
    Bool(bool),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    Regex { pattern: String, flags: String },
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Document(_) => "document",
            Value::Array(_) => "array",
            Value::Binary(_) => "binary",
            Value::ObjectId(_) => "objectid",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::Regex { .. } => "regular expression",
        }
    }

    /// Convert a JSON value, recognising the extended forms `{"$date": <millis>}`,
    /// `{"$oid": "<24 hex chars>"}` and `{"$regex": "...", "$options": "..."}`.
    pub fn from_json(json: serde_json::Value) -> Value {
        use serde_json::Value as J;

        match json {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            J::String(s) => Value::String(s),
            J::Array(items) => Value::Array(items.into_iter().map(Value::from_json).collect()),
            J::Object(map) => {
                if let Some(v) = extended_json(&map) {
                    return v;
                }
                Value::Document(Document {
                    fields: map
                        .into_iter()
                        .map(|(k, v)| (k, Value::from_json(v)))
                        .collect(),
                })
            }
        }
    }
}

fn extended_json(map: &serde_json::Map<String, serde_json::Value>) -> Option<Value> {
    use serde_json::Value as J;

    match (map.len(), map.iter().next()) {
        (1, Some((k, J::Number(n)))) if k == "$date" => n.as_i64().map(Value::Date),
        (1, Some((k, J::String(hex)))) if k == "$oid" => {
            hex.parse::<ObjectId>().ok().map(Value::ObjectId)
        }
        (1 | 2, Some((k, J::String(pattern)))) if k == "$regex" => {
            let flags = match map.get("$options") {
                Some(J::String(f)) => f.clone(),
                None if map.len() == 1 => String::new(),
                _ => return None,
            };
            Some(Value::Regex {
                pattern: pattern.clone(),
                flags,
            })
        }
        _ => None,
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Document> for Value {
    fn from(d: Document) -> Self {
        Value::Document(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// Ordered field list. Field names are unique; `insert` replaces in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    /// The document's `_id` field, if any.
    pub fn id(&self) -> Option<&Value> {
        self.get("_id")
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a document from a JSON object. Field order follows the input.
    pub fn from_json(json: serde_json::Value) -> Result<Document> {
        match Value::from_json(json) {
            Value::Document(d) => Ok(d),
            other => Err(Error::Json(format!(
                "expected a JSON object, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Document> {
        Self::from_json(serde_json::from_str(s)?)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}
