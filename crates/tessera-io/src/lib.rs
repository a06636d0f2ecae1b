//! Filesystem helpers shared by the capture, store and CLI crates

mod io;
mod paths;

pub use io::{atomic_write, to_jsonl};
pub use paths::{Paths, HOME_ENV};
