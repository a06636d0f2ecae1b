//! JSON Lines encoding and atomic file writes

use serde::Serialize;
use std::path::Path;

/// Encode records as JSON Lines, one record per line, in slice order
pub fn to_jsonl<T: Serialize>(records: &[T]) -> serde_json::Result<String> {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&serde_json::to_string(record)?);
    }
    Ok(out)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}
