//! Relation-aware CRUD engine for Canopy
//!
//! This crate turns "store this record" into "store this record, its
//! parent-link record and a reverse index, atomically":
//! - CrudOperation: create / put / update and their relation-aware variants
//! - Re-linking of every relation when an entity's display name changes
//! - EngineConfig: `canopy.toml` settings (per-call timeout)
//!
//! Each call performs at most two plain reads and exactly one
//! compare-and-branch commit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod crud;

pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use crud::{CrudOperation, LinkOutcome, RelWrite};
