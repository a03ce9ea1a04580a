//! Capability contracts between domain types and the CRUD engine
//!
//! - [`Entity`]: anything persisted under a unique string key
//! - [`EntityRelation`]: an entity with a parent in the hierarchy
//! - [`RelationRecord`]: one parent→child edge, keyed for prefix scans
//! - [`DLRel`]: reverse index from a child back to its relation record

pub mod dlrel;
pub mod entity;
pub mod relation;

pub use dlrel::{DLRel, DLR_SEPARATOR};
pub use entity::{Entity, EntityRelation};
pub use relation::RelationRecord;
