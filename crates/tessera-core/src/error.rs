use thiserror::Error;

/// Rejected input, reported before any capture or compression work starts
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no content found: the conversation has no messages")]
    NoContent,

    #[error("messageCount is {declared} but {actual} messages were supplied")]
    CountMismatch { declared: usize, actual: usize },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("malformed input: {0}")]
    Malformed(String),
}

/// Failure to produce a digest. Treat as fatal.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("cannot serialize value for hashing: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}.capacity must be at least 1")]
    ZeroCapacity(&'static str),
}
