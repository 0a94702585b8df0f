use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Both operands are of a type that has no defined sort order.
    #[error("Sorting not supported on {0}")]
    UnsortableValue(&'static str),

    #[error("Unsupported document id: {0}")]
    UnsupportedId(String),

    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
