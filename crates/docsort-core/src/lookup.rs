//! Dotted-path lookup with array branching.
//!
//! Resolving `a.b` against a document yields one [`Branch`] per reachable
//! value. Arrays met along the way fan the lookup out over their embedded
//! documents, and every branch records the array positions it went through,
//! so values from different paths can later be matched up position by position.
//!
//! This is the sort flavour of the lookup: a numeric segment after an array
//! only means "that element", never "that field of every element".

use std::fmt;

use crate::value::{Document, Value};

/// One array position on the way to a branch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexStep {
    /// The lookup fanned out over the array and took this element.
    Branch(usize),
    /// A numeric path segment selected this element explicitly.
    Explicit(usize),
}

/// Array positions traversed to reach a branch, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArrayIndices(Vec<IndexStep>);

impl ArrayIndices {
    pub fn new(steps: Vec<IndexStep>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[IndexStep] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn pushed(indices: Option<&ArrayIndices>, step: IndexStep) -> ArrayIndices {
        let mut steps = indices.map(|i| i.0.clone()).unwrap_or_default();
        steps.push(step);
        ArrayIndices(steps)
    }

    /// Canonical key: `"<i>,"` per branching step, `"<i>,x,"` per explicit step.
    pub fn path_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArrayIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            match step {
                IndexStep::Branch(i) => write!(f, "{},", i)?,
                IndexStep::Explicit(i) => write!(f, "{},x,", i)?,
            }
        }
        Ok(())
    }
}

impl From<Vec<IndexStep>> for ArrayIndices {
    fn from(steps: Vec<IndexStep>) -> Self {
        Self(steps)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub value: Value,
    /// `None` when no array was traversed; never `Some` of an empty path.
    pub array_indices: Option<ArrayIndices>,
    /// Set when an explicit index into an array produced another array, which
    /// must then be treated as a value rather than expanded.
    pub dont_iterate: bool,
}

impl Branch {
    /// A branch reached without traversing any array.
    pub fn sole(value: Value) -> Self {
        Self {
            value,
            array_indices: None,
            dont_iterate: false,
        }
    }

    pub fn indexed(value: Value, indices: impl Into<ArrayIndices>) -> Self {
        let indices = indices.into();
        Self {
            value,
            array_indices: (!indices.is_empty()).then_some(indices),
            dont_iterate: false,
        }
    }

    fn found(value: Value, indices: Option<ArrayIndices>, dont_iterate: bool) -> Self {
        Self {
            value,
            array_indices: indices.filter(|i| !i.is_empty()),
            dont_iterate,
        }
    }
}

/// Resolves a field against a document into branches.
pub trait BranchLookup: Send + Sync {
    fn lookup(&self, doc: &Document) -> Vec<Branch>;
}

/// A parsed dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

#[derive(Clone, Copy)]
enum Target<'a> {
    Doc(&'a Document),
    Array(&'a [Value]),
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn lookup_in(
        &self,
        depth: usize,
        target: Target<'_>,
        indices: Option<ArrayIndices>,
        out: &mut Vec<Branch>,
    ) {
        let part = &self.segments[depth];
        let is_last = depth + 1 == self.segments.len();

        let (found, indices, from_array) = match target {
            Target::Array(items) => {
                // Only an in-bounds numeric segment can address an array element.
                let Some(i) = numeric_segment(part).filter(|i| *i < items.len()) else {
                    return;
                };
                let indices = ArrayIndices::pushed(indices.as_ref(), IndexStep::Explicit(i));
                (Some(&items[i]), Some(indices), true)
            }
            Target::Doc(doc) => (doc.get(part), indices, false),
        };

        if is_last {
            let value = found.cloned().unwrap_or(Value::Null);
            let dont_iterate = from_array && matches!(value, Value::Array(_));
            out.push(Branch::found(value, indices, dont_iterate));
            return;
        }

        let next = match found {
            Some(Value::Document(d)) => Target::Doc(d),
            Some(Value::Array(items)) => Target::Array(items),
            _ => {
                // Digging below a scalar: nothing after an explicit index, else
                // a single missing (null) value.
                if !from_array {
                    out.push(Branch::found(Value::Null, indices, false));
                }
                return;
            }
        };

        self.lookup_in(depth + 1, next, indices.clone(), out);

        if let Target::Array(items) = next {
            if numeric_segment(&self.segments[depth + 1]).is_none() {
                for (i, item) in items.iter().enumerate() {
                    if let Value::Document(d) = item {
                        let branch_indices =
                            ArrayIndices::pushed(indices.as_ref(), IndexStep::Branch(i));
                        self.lookup_in(depth + 1, Target::Doc(d), Some(branch_indices), out);
                    }
                }
            }
        }
    }
}

impl BranchLookup for FieldPath {
    fn lookup(&self, doc: &Document) -> Vec<Branch> {
        let mut out = Vec::new();
        self.lookup_in(0, Target::Doc(doc), None, &mut out);
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn numeric_segment(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Replace every iterable array branch with one branch per element.
///
/// With `skip_arrays` the array itself is dropped; otherwise it is kept ahead
/// of its elements. Arrays flagged `dont_iterate` are always kept as values.
pub fn expand_arrays(branches: Vec<Branch>, skip_arrays: bool) -> Vec<Branch> {
    let mut out = Vec::with_capacity(branches.len());
    for branch in branches {
        match branch.value {
            Value::Array(items) if !branch.dont_iterate => {
                if !skip_arrays {
                    out.push(Branch {
                        value: Value::Array(items.clone()),
                        array_indices: branch.array_indices.clone(),
                        dont_iterate: false,
                    });
                }
                for (i, value) in items.into_iter().enumerate() {
                    out.push(Branch {
                        value,
                        array_indices: Some(ArrayIndices::pushed(
                            branch.array_indices.as_ref(),
                            IndexStep::Branch(i),
                        )),
                        dont_iterate: false,
                    });
                }
            }
            value => out.push(Branch {
                value,
                array_indices: branch.array_indices,
                dont_iterate: false,
            }),
        }
    }
    out
}
