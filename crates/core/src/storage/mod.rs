//! Key-value persistence
//!
//! The task store only needs string keys mapped to string values. This module
//! defines that contract and ships an in-memory and a file-backed backend.

mod file;
mod key_value;
mod memory;

pub use file::FileKeyValueStore;
pub use key_value::KeyValueStore;
pub use memory::MemoryKeyValueStore;
