use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_core::Speaker;

/// Entity category recognised by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Urls,
    Emails,
    Mentions,
    Hashtags,
    TechnicalTerms,
    Acronyms,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Urls => "urls",
            EntityKind::Emails => "emails",
            EntityKind::Mentions => "mentions",
            EntityKind::Hashtags => "hashtags",
            EntityKind::TechnicalTerms => "technicalTerms",
            EntityKind::Acronyms => "acronyms",
        }
    }
}

/// Deduplicated values of one entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGroup {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    IsA,
    RelatesTo,
    Causes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub subject: String,
    pub object: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Question,
    Instruction,
    Statement,
    Agreement,
    Disagreement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextFlags {
    pub has_code: bool,
    pub has_urls: bool,
    pub has_numbers: bool,
    pub length: usize,
    pub sentences: usize,
}

/// Tokenizer output for one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticToken {
    pub entities: Vec<EntityGroup>,
    pub concepts: Vec<WeightedTerm>,
    pub relationships: Vec<Relation>,
    pub intent: Intent,
    pub context: ContextFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionMetadata {
    pub version: String,
    pub platform: String,
    pub conversation_id: Option<String>,
    pub original_url: String,
    pub compressed_at: DateTime<Utc>,
    pub message_count: usize,
    pub compression_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    pub role: Speaker,
    pub index: usize,
    pub tokens: SemanticToken,
    pub summary: String,
    pub original_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedDocument {
    pub metadata: CompressionMetadata,
    pub semantic_tokens: Vec<TokenEntry>,
}

/// A message rebuilt from its summary and entity annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedMessage {
    pub role: Speaker,
    pub content: String,
    pub reconstructed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionMetadata {
    pub original_url: String,
    pub reconstructed_at: DateTime<Utc>,
    pub compression_ratio: f64,
}

/// Lossy inverse of [`CompressedDocument`]; never equal to the original input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructedConversation {
    pub platform: String,
    pub conversation_id: Option<String>,
    pub messages: Vec<ReconstructedMessage>,
    pub metadata: ReconstructionMetadata,
}
