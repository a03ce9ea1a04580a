//! Core types and traits for Canopy
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error type hierarchy (`CanopyError`, `BackendError`, `CodecError`)
//! - Deadline: per-operation deadlines and timeout factories
//! - Codec: versioned envelope for entity payloads
//! - Contract: `Entity`, `EntityRelation`, `RelationRecord`, `DLRel`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod contract;
pub mod deadline;
pub mod error;

pub use codec::Record;
pub use contract::{DLRel, Entity, EntityRelation, RelationRecord, DLR_SEPARATOR};
pub use deadline::{no_timeout, timeout_factory, Deadline, TimeoutFactory};
pub use error::{BackendError, CanopyError, CanopyResult, CodecError};
