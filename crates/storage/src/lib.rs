//! Storage Layer
//!
//! Frame records and the sinks that persist them: a bounded in-memory
//! repository and a JSON-lines writer.

mod repository;

pub use repository::{FrameRecord, FrameSink, JsonLinesSink, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Repository lock poisoned: {0}")]
    Lock(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
