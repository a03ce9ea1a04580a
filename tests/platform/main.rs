//! Platform Tests
//!
//! End-to-end tests through the top-level `Canopy` handle:
//! - Opening with a `canopy.toml` config directory
//! - Building and renaming a hierarchy
//! - Concurrent writers on one store

#[path = "../common/mod.rs"]
mod common;

mod concurrent;
mod config_open;
mod hierarchy;
