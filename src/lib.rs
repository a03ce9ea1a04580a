//! Canopy - hierarchical multi-tenant data platform
//!
//! Canopy stores instances, spaces, entes, categories and properties on an
//! ordered, revision-versioned key-value store. Every write of a child also
//! writes its parent-link record and a reverse index row in one atomic
//! commit, so the hierarchy can be walked in both directions.
//!
//! # Quick Start
//!
//! ```ignore
//! use canopy::{Canopy, Instance, Space};
//!
//! let canopy = Canopy::ephemeral();
//! let catalog = canopy.catalog();
//!
//! let instance = Instance::new("acme");
//! catalog.create_instance(&instance)?;
//! catalog.create_space(&Space::new(instance.key.clone(), "space1"))?;
//!
//! let spaces = catalog.spaces_of(&instance.key)?;
//! ```
//!
//! # Architecture
//!
//! - `canopy-core`: entity contracts, codec, errors, deadlines
//! - `canopy-storage`: `KvBackend`, `MemoryBackend` and the `Store` facade
//! - `canopy-concurrency`: the compare-and-branch `Transaction`
//! - `canopy-engine`: relation-aware `CrudOperation` and `EngineConfig`
//! - `canopy-primitives`: the domain entities and the `Catalog`

use std::path::Path;

pub use canopy_concurrency::Transaction;
pub use canopy_core::{
    CanopyError, CanopyResult, DLRel, Deadline, Entity, EntityRelation, RelationRecord,
};
pub use canopy_engine::{CrudOperation, EngineConfig, LinkOutcome, RelWrite, CONFIG_FILE_NAME};
pub use canopy_primitives::{
    Catalog, Category, Ente, Instance, Keyed, Property, PropertyType, Space,
};
pub use canopy_storage::{KvBackend, MemoryBackend, Store};

/// A configured engine bound to one store
#[derive(Debug, Clone)]
pub struct Canopy {
    config: EngineConfig,
    ops: CrudOperation,
}

impl Canopy {
    /// In-memory store with the default configuration
    pub fn ephemeral() -> Self {
        Self::with_config(Store::in_memory(), EngineConfig::default())
    }

    /// Engine over `store` configured by `config`
    pub fn with_config(store: Store, config: EngineConfig) -> Self {
        let ops = CrudOperation::from_config(store, &config);
        Canopy { config, ops }
    }

    /// Engine over `store` configured from the `canopy.toml` in `dir`
    ///
    /// A default config file is written first if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written, read or validated.
    pub fn open(store: Store, dir: &Path) -> CanopyResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        EngineConfig::write_default_if_missing(&path)?;
        let config = EngineConfig::from_file(&path)?;
        tracing::debug!(path = %path.display(), ?config, "engine config loaded");
        Ok(Self::with_config(store, config))
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generic CRUD operations
    pub fn ops(&self) -> &CrudOperation {
        &self.ops
    }

    /// Domain facade
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.ops.clone())
    }

    /// Close the underlying store
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails to close.
    pub fn close(&self) -> CanopyResult<()> {
        self.ops.store().close()
    }
}
