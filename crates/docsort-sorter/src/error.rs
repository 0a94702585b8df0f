use docsort_core::id::DocId;
use thiserror::Error;

/// Result type local to docsort-sorter.
pub type Result<T> = std::result::Result<T, SortError>;

/// Every variant is fatal: a malformed spec or an inconsistent document aborts
/// the operation rather than producing a silently wrong order.
#[derive(Debug, Error)]
pub enum SortError {
    #[error("invalid sort specification: {0}")]
    InvalidSpec(String),

    #[error("field '{path}' has {count} branches but no array was traversed")]
    InconsistentBranches { path: String, count: usize },

    #[error("duplicate array path '{key}' for field '{path}'")]
    DuplicatePath { path: String, key: String },

    #[error("cannot sort on parallel arrays (field '{path}')")]
    ParallelArrayMismatch { path: String },

    #[error("field '{path}' has no value at array path '{key}'")]
    MissingPath { path: String, key: String },

    #[error("sort key has {actual} values, expected {expected}")]
    KeyLengthMismatch { expected: usize, actual: usize },

    #[error("sort specification found no keys in document")]
    NoKeysFound,

    #[error("missing distance for document {0}")]
    MissingDistance(DocId),

    #[error("cannot generate sort keys without a sort specification")]
    EmptySpec,

    #[error("field '{path}' expanded to {count} branches (limit {limit})")]
    TooManyBranches {
        path: String,
        count: usize,
        limit: usize,
    },

    #[error(transparent)]
    Core(#[from] docsort_core::Error),
}
