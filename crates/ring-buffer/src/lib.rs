//! Fixed-Capacity Ring Buffer
//!
//! Provides an index-based, overwrite-oldest window used for temporal
//! confirmation of per-frame classifications.

mod buffer;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
