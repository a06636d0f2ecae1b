//! Snapshot records and the captures they are made from

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_capture::{Block, BlockStream};
use tessera_compress::CompressedDocument;
use tessera_core::RawConversation;

use crate::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Verbatim,
    Compressed,
    Raw,
}

impl SnapshotFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotFormat::Verbatim => "verbatim",
            SnapshotFormat::Compressed => "compressed",
            SnapshotFormat::Raw => "raw",
        }
    }
}

impl std::fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content handed to [`crate::SnapshotStore::save`]
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub source_url: String,
    pub title: String,
    pub platform: Option<String>,
    pub format: SnapshotFormat,
    pub content: Value,
    pub message_count: usize,
}

impl Capture {
    pub fn raw(conversation: &RawConversation) -> Result<Self, StorageError> {
        Ok(Self {
            source_url: conversation.url.clone(),
            title: conversation.title.clone(),
            platform: Some(conversation.platform.clone()),
            format: SnapshotFormat::Raw,
            content: serde_json::to_value(conversation)?,
            message_count: conversation.messages.len(),
        })
    }

    pub fn compressed(doc: &CompressedDocument, title: impl Into<String>) -> Result<Self, StorageError> {
        Ok(Self {
            source_url: doc.metadata.original_url.clone(),
            title: title.into(),
            platform: Some(doc.metadata.platform.clone()),
            format: SnapshotFormat::Compressed,
            content: serde_json::to_value(doc)?,
            message_count: doc.metadata.message_count,
        })
    }

    /// Stored as the JSON Lines text itself so the Merkle order survives
    pub fn verbatim(stream: &BlockStream, title: impl Into<String>) -> Result<Self, StorageError> {
        let source_url = stream.url().ok_or(StorageError::MissingUrl)?.to_string();
        let platform = stream.blocks().first().and_then(|b| match b {
            Block::Meta { source, .. } => Some(source.clone()),
            _ => None,
        });
        let message_count = stream
            .blocks()
            .iter()
            .filter(|b| matches!(b, Block::UserText { .. } | Block::AssistantText { .. }))
            .count();
        Ok(Self {
            source_url,
            title: title.into(),
            platform,
            format: SnapshotFormat::Verbatim,
            content: Value::String(stream.to_jsonl()?),
            message_count,
        })
    }

    /// Bytes the content hash is taken over
    pub(crate) fn content_bytes(&self) -> Result<Vec<u8>, StorageError> {
        Ok(match &self.content {
            Value::String(text) => text.as_bytes().to_vec(),
            other => serde_json::to_vec(other)?,
        })
    }
}

/// One persisted capture and its place in the version chain for its URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub source_url: String,
    pub title: String,
    #[serde(default)]
    pub platform: Option<String>,
    pub format: SnapshotFormat,
    pub content: Value,
    pub content_hash: String,
    pub version: u32,
    pub parent_id: Option<String>,
    pub root_id: String,
    pub saved_at: DateTime<Utc>,
    pub source: String,
    #[serde(default)]
    pub message_count: usize,
}

impl Snapshot {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none() && self.root_id == self.id
    }

    /// Content as text: verbatim streams as stored, everything else pretty JSON
    pub fn content_text(&self) -> Result<String, StorageError> {
        Ok(match &self.content {
            Value::String(text) => text.clone(),
            other => serde_json::to_string_pretty(other)?,
        })
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        Ok(serde_json::from_value(self.content.clone())?)
    }

    /// Parsed block stream of a verbatim snapshot
    pub fn block_stream(&self) -> Option<BlockStream> {
        match (&self.format, &self.content) {
            (SnapshotFormat::Verbatim, Value::String(text)) => BlockStream::from_jsonl(text).ok(),
            _ => None,
        }
    }
}
