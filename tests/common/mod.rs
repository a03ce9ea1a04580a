//! Shared test utilities for the workspace integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::Once;

pub use canopy::{
    Canopy, Catalog, CrudOperation, EngineConfig, Entity, Instance, Space, Store,
    CONFIG_FILE_NAME,
};
use tempfile::TempDir;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness once per binary
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Fixtures
// ============================================================================

/// Ephemeral engine with tracing enabled
pub fn ephemeral() -> Canopy {
    init_tracing();
    Canopy::ephemeral()
}

/// Engine opened from a fresh temporary config directory
pub fn opened() -> (Canopy, TempDir) {
    init_tracing();
    let dir = TempDir::new().expect("temp dir");
    let canopy = Canopy::open(Store::in_memory(), dir.path()).expect("open");
    (canopy, dir)
}

/// Instance with one space; returns both
pub fn seeded(catalog: &Catalog, space_name: &str) -> (Instance, Space) {
    let instance = Instance::new("tenant");
    assert!(catalog.create_instance(&instance).unwrap());
    let space = Space::new(instance.key(), space_name);
    assert!(catalog.create_space(&space).unwrap().applied);
    (instance, space)
}
