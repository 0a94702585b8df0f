#![forbid(unsafe_code)]
//! docsort-sorter: sort specifications, multikey sort keys and document comparators.
//!
//! Design intent:
//! - Compile a spec once into an immutable [`Sorter`]; every comparison after
//!   that is a pure function of the two documents.
//! - Array-valued fields contribute keys only from aligned array positions;
//!   inconsistent documents fail loudly instead of sorting wrongly.
//! - Comparators are small stored objects chained with [`Composed`].

pub mod compose;
pub mod distance;
pub mod error;
pub mod keys;
pub mod sorter;
pub mod spec;

pub use compose::{try_sort_by, Comparator, Composed};
pub use distance::DistanceMap;
pub use error::{Result, SortError};
pub use keys::{CandidateKeys, KeyVector};
pub use sorter::{ComparatorOptions, DocumentComparator, Sorter};
pub use spec::{SortKey, SortPart, SortSpec};
