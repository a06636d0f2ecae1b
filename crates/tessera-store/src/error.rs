use tessera_core::HashError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("capture has no source url")]
    MissingUrl,

    #[error("store capacity must be at least 1")]
    ZeroCapacity,

    #[error("store lock poisoned")]
    Poisoned,
}
