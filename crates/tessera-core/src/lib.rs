//! Shared conversation model, content hashing and configuration

mod config;
mod error;
pub mod hash;
mod types;

pub use config::{CaptureConfig, Config, StoreConfig};
pub use error::{ConfigError, HashError, InputError};
pub use types::{Message, Priority, RawConversation, Speaker};
