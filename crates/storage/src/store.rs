//! Store: the ordered KV abstraction used by the CRUD engine
//!
//! Writes never touch the backend directly. [`Store::put`], [`Store::put_raw`]
//! and [`Store::remove`] return a [`PendingOp`] that only takes effect once a
//! transaction commits it. Reads (`get`, `exists`, `start_key`, `range`) run
//! immediately against the backend and are not part of any transaction.
//!
//! Every read takes a `location` tag that is attached to backend failures.

use std::sync::Arc;

use canopy_core::{CanopyError, CanopyResult, Deadline, Entity};

use crate::backend::{KeyValue, KvBackend, PendingOp};
use crate::keys::prefix_range_end;
use crate::memory::MemoryBackend;

/// Ordered KV store over a shared backend
#[derive(Debug, Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl Store {
    /// Wrap an existing backend
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Store { backend }
    }

    /// Store over a fresh [`MemoryBackend`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Backend handle (used by transactions)
    pub fn backend(&self) -> &Arc<dyn KvBackend> {
        &self.backend
    }

    /// Encode `entity` into a pending write
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the entity fails to encode.
    pub fn put(&self, entity: &dyn Entity) -> CanopyResult<PendingOp> {
        let key = entity.key();
        let value = entity
            .encode()
            .map_err(|e| CanopyError::serialization(entity.kind(), key.as_str(), e))?;
        Ok(PendingOp::Put {
            key: key.into_bytes(),
            value,
        })
    }

    /// Pending write of pre-encoded bytes
    pub fn put_raw(&self, key: impl Into<Vec<u8>>, raw: impl Into<Vec<u8>>) -> PendingOp {
        PendingOp::Put {
            key: key.into(),
            value: raw.into(),
        }
    }

    /// Pending delete
    pub fn remove(&self, key: impl Into<Vec<u8>>) -> PendingOp {
        PendingOp::Delete { key: key.into() }
    }

    /// Read `key` into `out`
    ///
    /// Returns `false` (leaving `out` untouched) when the key is absent.
    ///
    /// # Errors
    ///
    /// Storage errors carry `location`; decode failures are serialization errors.
    pub fn get<E: Entity + ?Sized>(
        &self,
        location: &str,
        deadline: &Deadline,
        key: &str,
        out: &mut E,
    ) -> CanopyResult<bool> {
        let Some(kv) = self.get_raw(location, deadline, key)? else {
            return Ok(false);
        };
        out.decode_from(&kv.value)
            .map_err(|e| CanopyError::serialization(out.kind(), key, e))?;
        Ok(true)
    }

    /// Read the raw bytes and revisions stored under `key`
    ///
    /// # Errors
    ///
    /// Storage errors carry `location`.
    pub fn get_raw(
        &self,
        location: &str,
        deadline: &Deadline,
        key: &str,
    ) -> CanopyResult<Option<KeyValue>> {
        tracing::trace!(location, key, "store get");
        self.backend
            .get(deadline, key.as_bytes())
            .map_err(|e| CanopyError::storage(location, key, e))
    }

    /// True only when `key` itself is stored
    ///
    /// Scans from `key` with limit 1 and requires the first hit to be equal,
    /// so a longer key sharing the prefix (`"ab"` for `"a"`) does not count.
    ///
    /// # Errors
    ///
    /// Storage errors carry `location`.
    pub fn exists(&self, location: &str, deadline: &Deadline, key: &str) -> CanopyResult<bool> {
        tracing::trace!(location, key, "store exists");
        let hits = self
            .backend
            .scan(deadline, key.as_bytes(), None, 1)
            .map_err(|e| CanopyError::storage(location, key, e))?;
        Ok(hits.first().is_some_and(|kv| kv.key == key.as_bytes()))
    }

    /// Ascending scan of keys starting with `prefix`, at most `top` (0 = all)
    ///
    /// # Errors
    ///
    /// Storage errors carry `location`; decode failures are serialization errors.
    pub fn start_key<E, F>(
        &self,
        location: &str,
        deadline: &Deadline,
        prefix: &str,
        top: usize,
        factory: F,
    ) -> CanopyResult<Vec<E>>
    where
        E: Entity,
        F: Fn() -> E,
    {
        tracing::trace!(location, prefix, top, "store start_key");
        let end = prefix_range_end(prefix.as_bytes());
        let hits = self
            .backend
            .scan(deadline, prefix.as_bytes(), end.as_deref(), top)
            .map_err(|e| CanopyError::storage(location, prefix, e))?;
        Self::decode_all(hits, factory)
    }

    /// Ascending scan from `from`, bounded by the prefix range of `to_prefix`
    ///
    /// Used for name-ordered pagination: `from` is the last key of the previous
    /// page (or the first key of interest) and `to_prefix` the parent prefix.
    ///
    /// # Errors
    ///
    /// Storage errors carry `location`; decode failures are serialization errors.
    pub fn range<E, F>(
        &self,
        location: &str,
        deadline: &Deadline,
        from: &str,
        to_prefix: &str,
        top: usize,
        factory: F,
    ) -> CanopyResult<Vec<E>>
    where
        E: Entity,
        F: Fn() -> E,
    {
        tracing::trace!(location, from, to_prefix, top, "store range");
        let end = prefix_range_end(to_prefix.as_bytes());
        let hits = self
            .backend
            .scan(deadline, from.as_bytes(), end.as_deref(), top)
            .map_err(|e| CanopyError::storage(location, from, e))?;
        Self::decode_all(hits, factory)
    }

    /// Current backend revision
    pub fn revision(&self) -> u64 {
        self.backend.revision()
    }

    /// Close the backend
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails to close.
    pub fn close(&self) -> CanopyResult<()> {
        self.backend
            .close()
            .map_err(|e| CanopyError::storage("store.close", "", e))
    }

    fn decode_all<E, F>(hits: Vec<KeyValue>, factory: F) -> CanopyResult<Vec<E>>
    where
        E: Entity,
        F: Fn() -> E,
    {
        hits.into_iter()
            .map(|kv| {
                let mut entity = factory();
                entity.decode_from(&kv.value).map_err(|e| {
                    CanopyError::serialization(
                        entity.kind(),
                        String::from_utf8_lossy(&kv.key).into_owned(),
                        e,
                    )
                })?;
                Ok(entity)
            })
            .collect()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}
