use tessera_core::{HashError, InputError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// A stored block stream no longer matches its manifest
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("line {line}: not a valid block: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("stream is empty")]
    Empty,

    #[error("first block must be meta, found {0}")]
    MissingMeta(&'static str),

    #[error("stream has no manifest block")]
    MissingManifest,

    #[error("manifest must be second to last (found at {position} of {total})")]
    ManifestPosition { position: usize, total: usize },

    #[error("last block must be the system note, found {0}")]
    MissingSystemNote(&'static str),

    #[error("manifest records {recorded} blocks but {actual} precede it")]
    CountMismatch { recorded: usize, actual: usize },

    #[error("merkle root mismatch: manifest has {recorded}, blocks hash to {computed}")]
    RootMismatch { recorded: String, computed: String },

    #[error(transparent)]
    Hash(#[from] HashError),
}
