//! Storage layer: a minimal key-value boundary and the history store built on it.

mod error;
pub use error::StoreError;

mod kv;
pub use kv::{FileStore, KeyValueStore, MemoryStore};

mod records;
pub use records::{HISTORY_KEY, RecordStore};
