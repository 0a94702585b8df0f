//! Convenient re-exports for downstream crates.

pub use crate::config::SortConfig;
pub use crate::error::{Error, Result};
pub use crate::id::{DocId, ObjectId};
pub use crate::lookup::{expand_arrays, ArrayIndices, Branch, BranchLookup, FieldPath, IndexStep};
pub use crate::order::{compare_values, StringOrder, ValueOrder};
pub use crate::value::{Document, Value};
