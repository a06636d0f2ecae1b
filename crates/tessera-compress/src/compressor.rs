//! Conversation-level semantic compression and lossy reconstruction

use chrono::Utc;
use serde::Serialize;
use tessera_core::{InputError, RawConversation};

use crate::summary::summarize;
use crate::tokenizer::tokenize;
use crate::types::{
    CompressedDocument, CompressionMetadata, ReconstructedConversation, ReconstructedMessage,
    ReconstructionMetadata, TokenEntry,
};

/// Version tag written into every compressed document
pub const FORMAT_VERSION: &str = "1.0";

/// Tokenize and summarize every message, then measure the size reduction.
///
/// Tolerates an empty message list (empty `semanticTokens`). Use
/// [`compress_checked`] at entry points that must reject empty input.
pub fn compress(conversation: &RawConversation) -> CompressedDocument {
    let semantic_tokens: Vec<TokenEntry> = conversation
        .messages
        .iter()
        .map(|message| TokenEntry {
            role: message.role,
            index: message.index,
            tokens: tokenize(&message.content),
            summary: summarize(&message.content),
            original_length: message.content.chars().count(),
        })
        .collect();

    let mut doc = CompressedDocument {
        metadata: CompressionMetadata {
            version: FORMAT_VERSION.to_string(),
            platform: conversation.platform.clone(),
            conversation_id: conversation.conversation_id.clone(),
            original_url: conversation.url.clone(),
            compressed_at: Utc::now(),
            message_count: conversation.messages.len(),
            compression_ratio: 0.0,
        },
        semantic_tokens,
    };

    let original_size = serialized_len(conversation);
    let compressed_size = serialized_len(&doc);
    doc.metadata.compression_ratio = compression_ratio(original_size, compressed_size);

    tracing::debug!(
        messages = doc.metadata.message_count,
        original_size,
        compressed_size,
        ratio = doc.metadata.compression_ratio,
        "compressed conversation"
    );
    doc
}

/// [`compress`] after rejecting empty or inconsistent input
pub fn compress_checked(conversation: &RawConversation) -> Result<CompressedDocument, InputError> {
    conversation.validate()?;
    Ok(compress(conversation))
}

/// `original / compressed` rounded to two decimals; zero when nothing was produced
pub fn compression_ratio(original_size: usize, compressed_size: usize) -> f64 {
    if compressed_size == 0 {
        return 0.0;
    }
    let ratio = original_size as f64 / compressed_size as f64;
    (ratio * 100.0).round() / 100.0
}

fn serialized_len<T: Serialize>(value: &T) -> usize {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes.len(),
        Err(e) => {
            tracing::warn!("cannot measure serialized size: {}", e);
            0
        }
    }
}

/// Rebuild messages from summaries plus one `[type: values]` line per entity group.
///
/// Everything except the summary and entities is lost; the output is flagged
/// `reconstructed` and must not be compared against the original text.
pub fn reconstruct(doc: &CompressedDocument) -> ReconstructedConversation {
    let messages = doc
        .semantic_tokens
        .iter()
        .map(|entry| {
            let mut content = entry.summary.clone();
            for group in &entry.tokens.entities {
                content.push_str(&format!(
                    "\n[{}: {}]",
                    group.kind.as_str(),
                    group.values.join(", ")
                ));
            }
            ReconstructedMessage {
                role: entry.role,
                content,
                reconstructed: true,
            }
        })
        .collect();

    ReconstructedConversation {
        platform: doc.metadata.platform.clone(),
        conversation_id: doc.metadata.conversation_id.clone(),
        messages,
        metadata: ReconstructionMetadata {
            original_url: doc.metadata.original_url.clone(),
            reconstructed_at: Utc::now(),
            compression_ratio: doc.metadata.compression_ratio,
        },
    }
}
