//! Total cross-type ordering of document values.
//!
//! Types order as
//! `null < number < string < document < array < binary < objectid < bool < date < regex`.
//! Within a type:
//! - numbers compare numerically; NaN sorts below every other number
//! - strings compare by UTF-16 code unit (or code point, see [`StringOrder`])
//! - documents compare as the flattened sequence `k1, v1, k2, v2, ...`
//! - arrays compare element-wise; a strict prefix sorts first
//! - binary compares by length, then byte-wise
//! - regular expressions have no order; comparing two of them is an error

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::value::{Document, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringOrder {
    /// UTF-16 code unit order, as the reference database's in-memory engine.
    #[default]
    Utf16,
    /// Unicode scalar value order (plain `str` ordering).
    CodePoint,
}

impl FromStr for StringOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf16" | "utf-16" => Ok(StringOrder::Utf16),
            "codepoint" | "code-point" => Ok(StringOrder::CodePoint),
            other => Err(Error::Config(format!("unknown string order '{}'", other))),
        }
    }
}

/// Value comparator. Cheap to copy; holds only the string collation choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueOrder {
    string_order: StringOrder,
}

impl ValueOrder {
    pub const fn new(string_order: StringOrder) -> Self {
        Self { string_order }
    }

    pub const fn string_order(&self) -> StringOrder {
        self.string_order
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        let (ta, tb) = (type_order(a), type_order(b));
        if ta != tb {
            return Ok(ta.cmp(&tb));
        }

        Ok(match (a, b) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Number(x), Value::Number(y)) => compare_numbers(*x, *y),
            (Value::String(x), Value::String(y)) => self.compare_strings(x, y),
            (Value::Document(x), Value::Document(y)) => return self.compare_documents(x, y),
            (Value::Array(x), Value::Array(y)) => return self.compare_arrays(x, y),
            (Value::Binary(x), Value::Binary(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
            (Value::ObjectId(x), Value::ObjectId(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Date(x), Value::Date(y)) => x.cmp(y),
            (Value::Regex { .. }, Value::Regex { .. }) => {
                return Err(Error::UnsortableValue("regular expression"))
            }
            // Equal type orders imply equal variants.
            _ => Ordering::Equal,
        })
    }

    fn compare_strings(&self, a: &str, b: &str) -> Ordering {
        match self.string_order {
            StringOrder::Utf16 => a.encode_utf16().cmp(b.encode_utf16()),
            StringOrder::CodePoint => a.cmp(b),
        }
    }

    fn compare_arrays(&self, a: &[Value], b: &[Value]) -> Result<Ordering> {
        for (x, y) in a.iter().zip(b) {
            match self.compare(x, y)? {
                Ordering::Equal => continue,
                other => return Ok(other),
            }
        }
        Ok(a.len().cmp(&b.len()))
    }

    fn compare_documents(&self, a: &Document, b: &Document) -> Result<Ordering> {
        for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
            match self.compare_strings(ka, kb) {
                Ordering::Equal => {}
                other => return Ok(other),
            }
            match self.compare(va, vb)? {
                Ordering::Equal => {}
                other => return Ok(other),
            }
        }
        Ok(a.len().cmp(&b.len()))
    }
}

/// Compare with the default (UTF-16) string order.
pub fn compare_values(a: &Value, b: &Value) -> Result<Ordering> {
    ValueOrder::default().compare(a, b)
}

fn compare_numbers(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

/// Assign a rank to value types for mixed-type comparisons.
fn type_order(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Document(_) => 3,
        Value::Array(_) => 4,
        Value::Binary(_) => 5,
        Value::ObjectId(_) => 6,
        Value::Bool(_) => 7,
        Value::Date(_) => 8,
        Value::Regex { .. } => 9,
    }
}
