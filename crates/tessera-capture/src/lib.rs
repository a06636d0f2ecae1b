//! Verbatim block capture with Merkle-rooted integrity manifests

mod block;
mod capturer;
mod document;
mod error;
pub mod inference;
pub mod merkle;

pub use block::{Block, BlockStream, Predicate, StreamStats};
pub use capturer::{detect_filename, detect_language, detect_source, is_code_like, BlockCapturer};
pub use document::{classify_role, Document, Node};
pub use error::{CaptureError, IntegrityError};
pub use merkle::merkle_root;
