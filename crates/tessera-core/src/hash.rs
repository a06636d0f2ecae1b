//! SHA-256 content digests
//!
//! Three uses share these helpers: full-length digests for whole documents,
//! truncated digests for compact block and snapshot hashes, and the pairwise
//! combination step of Merkle roots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::HashError;

pub const ALGORITHM: &str = "SHA-256";

/// Length in hex chars of a full digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Shortest truncated digest accepted by [`verify`]
pub const MIN_VERIFY_LEN: usize = 8;

/// Full lowercase hex SHA-256 of `bytes`
pub fn digest(bytes: impl AsRef<[u8]>) -> String {
    format!("{:x}", Sha256::digest(bytes.as_ref()))
}

/// First `len` hex chars of the digest (clamped to the full length)
pub fn short_digest(bytes: impl AsRef<[u8]>, len: usize) -> String {
    let mut full = digest(bytes);
    full.truncate(len.min(DIGEST_HEX_LEN));
    full
}

/// Digest of two child digests, used to build Merkle levels
pub fn digest_pair(left: &str, right: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Digest of the canonical JSON encoding of `value`
pub fn hash_json<T: Serialize + ?Sized>(value: &T) -> Result<String, HashError> {
    let encoded = serde_json::to_vec(value)?;
    Ok(digest(encoded))
}

/// Recompute and compare. `expected` may be a full digest or a prefix of at
/// least [`MIN_VERIFY_LEN`] chars; comparison is case-insensitive.
pub fn verify(content: impl AsRef<[u8]>, expected: &str) -> bool {
    let expected = expected.trim().to_ascii_lowercase();
    if expected.len() < MIN_VERIFY_LEN || expected.len() > DIGEST_HEX_LEN {
        return false;
    }
    digest(content).starts_with(&expected)
}

/// [`verify`] over the canonical JSON encoding of `value`
pub fn verify_json<T: Serialize + ?Sized>(value: &T, expected: &str) -> Result<bool, HashError> {
    let encoded = serde_json::to_vec(value)?;
    Ok(verify(encoded, expected))
}

/// Digest plus provenance, as handed to consumers that store it alongside data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashReport {
    pub hash: String,
    pub algorithm: String,
    pub generated_at: DateTime<Utc>,
    pub data_size: usize,
}

pub fn report(bytes: impl AsRef<[u8]>) -> HashReport {
    let bytes = bytes.as_ref();
    HashReport {
        hash: digest(bytes),
        algorithm: ALGORITHM.to_string(),
        generated_at: Utc::now(),
        data_size: bytes.len(),
    }
}

pub fn report_json<T: Serialize + ?Sized>(value: &T) -> Result<HashReport, HashError> {
    let encoded = serde_json::to_vec(value)?;
    Ok(report(encoded))
}
