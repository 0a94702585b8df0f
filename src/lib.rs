#![forbid(unsafe_code)]
//! docsort: order schema-less documents the way the reference document
//! database does, including sorts on fields inside arrays.
//!
//! ```
//! use docsort::{Document, SortSpec, Sorter};
//!
//! let sorter = Sorter::new(&SortSpec::from_json_str(r#"{"a.x": 1}"#)?)?;
//! let mut docs = vec![
//!     Document::from_json_str(r#"{"a": [{"x": 4}, {"x": 2}]}"#)?,
//!     Document::from_json_str(r#"{"a": {"x": 3}}"#)?,
//! ];
//! sorter.sort_documents(&mut docs)?;
//! assert_eq!(docs[0].get("a").and_then(|a| a.as_array()).map(|a| a.len()), Some(2));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use docsort_core::config::SortConfig;
pub use docsort_core::id::{DocId, ObjectId};
pub use docsort_core::order::{compare_values, StringOrder, ValueOrder};
pub use docsort_core::value::{Document, Value};
pub use docsort_sorter::{
    try_sort_by, CandidateKeys, Comparator, ComparatorOptions, Composed, DistanceMap,
    DocumentComparator, KeyVector, SortError, SortKey, SortPart, SortSpec, Sorter,
};
