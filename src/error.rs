use thiserror::Error;

/// Every failure the library can report.
///
/// Nothing here is retried or recovered internally: a bad layer-size list,
/// a vector of the wrong length or an unreadable artifact stops the
/// operation and is handed back to the caller.
#[derive(Debug, Error)]
pub enum NetError {
    /// Malformed layer sizes or training settings.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A vector or matrix does not have the length/shape the network expects.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// `backward` was handed a forward cache produced by a different network.
    #[error("forward cache does not belong to this network: {0}")]
    StaleCache(String),

    /// An IDX image/label file failed validation.
    #[error("malformed dataset: {0}")]
    Dataset(String),

    /// A model artifact is missing an entry or holds the wrong kind of value.
    #[error("malformed model artifact: {0}")]
    Artifact(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;
