//! Semantic compression of conversations with lossy reconstruction

pub mod analyzer;
pub mod compressor;
mod summary;
pub mod tokenizer;
mod types;

pub use analyzer::{
    analyze, ActionKind, ActionVector, AnchorStatus, ReconstructionProtocol, SemanticAnalysis,
    SemanticAnchor, Topic,
};
pub use compressor::{compress, compress_checked, compression_ratio, reconstruct, FORMAT_VERSION};
pub use summary::{split_sentences, summarize};
pub use tokenizer::tokenize;
pub use types::{
    CompressedDocument, CompressionMetadata, ContextFlags, EntityGroup, EntityKind, Intent,
    ReconstructedConversation, ReconstructedMessage, ReconstructionMetadata, Relation,
    RelationKind, SemanticToken, TokenEntry, WeightedTerm,
};
