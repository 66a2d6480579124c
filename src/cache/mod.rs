//! Response cache storage
//!
//! This module defines the `Store` capability the request cache reads and
//! writes through, the time-stamped `CacheEntry` it stores, and two stores:
//! an in-memory map and a directory of JSON files. Expired entries are never
//! swept here; the request cache deletes them lazily when it reads them.

mod file;
mod store;

pub use file::FileStore;
pub use store::{CacheEntry, Clock, MemoryStore, Store, StoreError, SystemClock};
