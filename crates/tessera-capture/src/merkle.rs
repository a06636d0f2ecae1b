//! Merkle root over an ordered block sequence

use tessera_core::hash::{digest, digest_pair, hash_json};
use tessera_core::HashError;

use crate::Block;

/// Digest of each block's canonical JSON, in order
pub fn leaf_digests(blocks: &[Block]) -> Result<Vec<String>, HashError> {
    blocks.iter().map(hash_json).collect()
}

/// Pair adjacent digests level by level; an odd last digest pairs with itself.
/// `None` for an empty list.
pub fn fold_digests(mut level: Vec<String>) -> Option<String> {
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                digest_pair(left, right)
            })
            .collect();
    }
    level.pop()
}

/// Root of `blocks`. An empty sequence hashes to the digest of no bytes.
pub fn merkle_root(blocks: &[Block]) -> Result<String, HashError> {
    let leaves = leaf_digests(blocks)?;
    Ok(fold_digests(leaves).unwrap_or_else(|| digest(b"")))
}
