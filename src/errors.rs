use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The backing file exists but does not parse as the store's document.
    /// Recovered inside the engine's load path (logged, replaced by an empty
    /// document); callers never receive it from a read.
    #[error("Store file {path:?} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory or backing file cannot be created, read, or
    /// written. Propagates to the caller; the in-memory document is left
    /// unchanged.
    #[error("Storage unavailable at {path:?}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A caller supplied an empty guild/channel/user/message identifier.
    /// Rejected before any I/O is attempted.
    #[error("Invalid {0} identifier: must be a non-empty string")]
    InvalidKey(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
