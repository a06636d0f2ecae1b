//! Verbatim block model and the JSON Lines stream it serializes to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::Priority;

use crate::merkle::merkle_root;
use crate::IntegrityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    FollowedBy,
    Imports,
}

/// One typed, hashable unit of captured content. `t` is the discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "kebab-case")]
pub enum Block {
    Meta {
        id: String,
        version: String,
        source: String,
        url: String,
        timestamp: DateTime<Utc>,
    },
    UserText {
        text: String,
    },
    AssistantText {
        text: String,
    },
    Code {
        language: String,
        filename: Option<String>,
        #[serde(rename = "contentHash")]
        content_hash: String,
        verbatim: String,
    },
    Relationship {
        subject: String,
        predicate: Predicate,
        object: String,
    },
    NextAction {
        action: String,
        priority: Priority,
        owner: String,
        #[serde(rename = "autoDetected")]
        auto_detected: bool,
    },
    Manifest {
        #[serde(rename = "merkleRoot")]
        merkle_root: String,
        #[serde(rename = "blockCount")]
        block_count: usize,
        timestamp: DateTime<Utc>,
    },
    SystemNote {
        text: String,
    },
}

impl Block {
    /// The serialized discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Meta { .. } => "meta",
            Block::UserText { .. } => "user-text",
            Block::AssistantText { .. } => "assistant-text",
            Block::Code { .. } => "code",
            Block::Relationship { .. } => "relationship",
            Block::NextAction { .. } => "next-action",
            Block::Manifest { .. } => "manifest",
            Block::SystemNote { .. } => "system-note",
        }
    }
}

/// Per-kind totals of a stream
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStats {
    pub total_blocks: usize,
    pub by_kind: BTreeMap<String, usize>,
    pub languages: Vec<String>,
    pub files: Vec<String>,
}

/// Blocks in emission order. Never re-sorted; the order is part of the
/// Merkle root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockStream {
    blocks: Vec<Block>,
}

impl BlockStream {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn id(&self) -> Option<&str> {
        match self.blocks.first() {
            Some(Block::Meta { id, .. }) => Some(id),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self.blocks.first() {
            Some(Block::Meta { url, .. }) => Some(url),
            _ => None,
        }
    }

    /// Recorded root from the manifest, if there is one
    pub fn merkle_root(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Manifest { merkle_root, .. } => Some(merkle_root.as_str()),
            _ => None,
        })
    }

    /// One canonical JSON encoding per line, no trailing newline
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        tessera_io::to_jsonl(&self.blocks)
    }

    /// Strict parse; any bad line fails the whole stream. Blank lines are skipped.
    pub fn from_jsonl(input: &str) -> Result<Self, IntegrityError> {
        let mut blocks = Vec::new();
        for (i, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let block = serde_json::from_str(line)
                .map_err(|source| IntegrityError::Malformed { line: i + 1, source })?;
            blocks.push(block);
        }
        Ok(Self { blocks })
    }

    /// Recompute the root over every block before the manifest and compare it
    /// with the recorded root and count. Returns the verified root.
    pub fn verify(&self) -> Result<String, IntegrityError> {
        let first = self.blocks.first().ok_or(IntegrityError::Empty)?;
        if !matches!(first, Block::Meta { .. }) {
            return Err(IntegrityError::MissingMeta(first.kind()));
        }

        let position = self
            .blocks
            .iter()
            .position(|b| matches!(b, Block::Manifest { .. }))
            .ok_or(IntegrityError::MissingManifest)?;
        if position + 2 != self.blocks.len() {
            return Err(IntegrityError::ManifestPosition {
                position,
                total: self.blocks.len(),
            });
        }
        if let Some(last) = self.blocks.last() {
            if !matches!(last, Block::SystemNote { .. }) {
                return Err(IntegrityError::MissingSystemNote(last.kind()));
            }
        }

        let (recorded_root, recorded_count) = match &self.blocks[position] {
            Block::Manifest {
                merkle_root,
                block_count,
                ..
            } => (merkle_root.clone(), *block_count),
            _ => return Err(IntegrityError::MissingManifest),
        };
        if recorded_count != position {
            return Err(IntegrityError::CountMismatch {
                recorded: recorded_count,
                actual: position,
            });
        }

        let computed = merkle_root(&self.blocks[..position])?;
        if computed != recorded_root {
            return Err(IntegrityError::RootMismatch {
                recorded: recorded_root,
                computed,
            });
        }
        Ok(computed)
    }

    pub fn stats(&self) -> StreamStats {
        let mut stats = StreamStats {
            total_blocks: self.blocks.len(),
            ..StreamStats::default()
        };
        for block in &self.blocks {
            *stats.by_kind.entry(block.kind().to_string()).or_insert(0) += 1;
            if let Block::Code {
                language, filename, ..
            } = block
            {
                if !stats.languages.contains(language) {
                    stats.languages.push(language.clone());
                }
                if let Some(file) = filename {
                    if !stats.files.contains(file) {
                        stats.files.push(file.clone());
                    }
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags() {
        let block = Block::Code {
            language: "js".to_string(),
            filename: None,
            content_hash: "deadbeef".to_string(),
            verbatim: "f()".to_string(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["t"], "code");
        assert_eq!(json["contentHash"], "deadbeef");
        assert!(json["filename"].is_null());

        let action = Block::NextAction {
            action: "add tests".to_string(),
            priority: Priority::Medium,
            owner: "next_instance".to_string(),
            auto_detected: true,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["t"], "next-action");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["autoDetected"], true);

        let rel = Block::Relationship {
            subject: "a.js".to_string(),
            predicate: Predicate::FollowedBy,
            object: "b.js".to_string(),
        };
        assert_eq!(serde_json::to_value(&rel).unwrap()["predicate"], "followed_by");
    }

    #[test]
    fn test_from_jsonl_reports_line() {
        let input = "{\"t\":\"user-text\",\"text\":\"hi\"}\n\n{\"t\":\"bogus\"}";
        match BlockStream::from_jsonl(input) {
            Err(IntegrityError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_verify_structure_errors() {
        assert!(matches!(BlockStream::default().verify(), Err(IntegrityError::Empty)));

        let no_meta = BlockStream::new(vec![Block::UserText {
            text: "x".to_string(),
        }]);
        assert!(matches!(
            no_meta.verify(),
            Err(IntegrityError::MissingMeta("user-text"))
        ));
    }

    #[test]
    fn test_stats() {
        let stream = BlockStream::new(vec![
            Block::UserText {
                text: "q".to_string(),
            },
            Block::Code {
                language: "rust".to_string(),
                filename: Some("main.rs".to_string()),
                content_hash: "00000000".to_string(),
                verbatim: "fn main(){}".to_string(),
            },
            Block::Code {
                language: "rust".to_string(),
                filename: None,
                content_hash: "11111111".to_string(),
                verbatim: "let x = 1;".to_string(),
            },
        ]);
        let stats = stream.stats();
        assert_eq!(stats.total_blocks, 3);
        assert_eq!(stats.by_kind["code"], 2);
        assert_eq!(stats.by_kind["user-text"], 1);
        assert_eq!(stats.languages, vec!["rust"]);
        assert_eq!(stats.files, vec!["main.rs"]);
    }
}
