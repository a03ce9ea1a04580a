//! Storage layer for Canopy
//!
//! This crate implements the ordered key-value store abstraction with:
//! - KvBackend: contract of an ordered, revision-versioned substrate
//! - MemoryBackend: BTreeMap-based reference backend with RwLock
//! - Store: entity-aware reads and pending (not yet applied) writes
//! - prefix_range_end: upper bound for prefix and name-ordered range scans

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod keys;
pub mod memory;
pub mod store;

pub use backend::{KeyValue, KvBackend, PendingOp, RevisionCompare, TxnRequest, TxnResponse};
pub use keys::prefix_range_end;
pub use memory::MemoryBackend;
pub use store::Store;
