//! Relation-aware CRUD operations
//!
//! Every operation follows the same shape: zero, one or two plain reads, then
//! pending writes queued on a [`Transaction`] and a single commit. The gate
//! key's existence at commit time decides between "create" and "update":
//!
//! | operation         | gate            | found branch              | not-found branch                  |
//! |-------------------|-----------------|---------------------------|-----------------------------------|
//! | `create`          | entity key      | (nothing)                 | entity                            |
//! | `put`             | entity key      | entity                    | entity                            |
//! | `create_with_rel` | entity key      | (nothing)                 | entity, relation, DLRel           |
//! | `put_with_rel`    | entity key      | entity (+ relink on rename) | entity (+ relation, DLRel)      |
//! | `link_to`         | relation key    | (nothing)                 | relation, DLRel                   |
//!
//! Parent checks are plain reads taken before the commit. A parent removed
//! between the check and the commit is not detected.

use std::fmt;

use canopy_concurrency::{Transaction, DEFAULT_BRANCH_CAPACITY};
use canopy_core::{
    no_timeout, CanopyResult, DLRel, Deadline, Entity, EntityRelation, RelationRecord,
    TimeoutFactory,
};
use canopy_storage::Store;

use crate::config::EngineConfig;

/// Outcome of a write that also maintains the parent relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelWrite {
    /// `create_with_rel`: the entity was created.
    /// `put_with_rel`: the entity already existed and was overwritten.
    pub applied: bool,
    /// The parent was present (or the entity already existed)
    pub parent_found: bool,
}

impl RelWrite {
    fn parent_missing() -> Self {
        RelWrite {
            applied: false,
            parent_found: false,
        }
    }
}

/// Outcome of [`CrudOperation::link_to`]
#[derive(Debug)]
pub struct LinkOutcome {
    /// The child entity was found and loaded
    pub child_found: bool,
    /// The parent key exists
    pub parent_found: bool,
    /// Relation record queued for the new edge
    pub relation: Option<Box<dyn Entity>>,
}

impl LinkOutcome {
    fn missing(child_found: bool) -> Self {
        LinkOutcome {
            child_found,
            parent_found: false,
            relation: None,
        }
    }

    /// Both endpoints were present and the edge was queued
    pub fn is_linked(&self) -> bool {
        self.child_found && self.parent_found
    }
}

/// CRUD front end over a [`Store`]
///
/// Cheap to clone; clones share the store and the timeout factory.
#[derive(Clone)]
pub struct CrudOperation {
    store: Store,
    timeout: TimeoutFactory,
}

impl fmt::Debug for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudOperation")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl CrudOperation {
    /// Operations over `store` with no deadline
    pub fn new(store: Store) -> Self {
        CrudOperation {
            store,
            timeout: no_timeout(),
        }
    }

    /// Operations over `store` configured from `config`
    pub fn from_config(store: Store, config: &EngineConfig) -> Self {
        CrudOperation {
            store,
            timeout: config.timeout(),
        }
    }

    /// Replace the deadline factory
    pub fn with_timeout(mut self, timeout: TimeoutFactory) -> Self {
        self.timeout = timeout;
        self
    }

    /// Underlying store
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn deadline(&self) -> Deadline {
        (self.timeout)()
    }

    // ========================================================================
    // Plain entities
    // ========================================================================

    /// Load the entity stored under `entity.key()` into `entity`
    ///
    /// Returns `false` (leaving `entity` untouched) when the key is absent.
    ///
    /// # Errors
    ///
    /// Decode failures are serialization errors; store failures are storage
    /// errors tagged with `location`.
    pub fn get<E: Entity>(&self, location: &str, entity: &mut E) -> CanopyResult<bool> {
        let deadline = self.deadline();
        let key = entity.key();
        self.store.get(location, &deadline, &key, entity)
    }

    /// Store `entity` only if its key is absent; returns whether it was created
    ///
    /// An existing key is left untouched and is not an error.
    ///
    /// # Errors
    ///
    /// Encode failures are serialization errors; store failures (including an
    /// expired deadline) are storage errors tagged with `location`.
    pub fn create<E: Entity>(&self, location: &str, entity: &E) -> CanopyResult<bool> {
        let deadline = self.deadline();
        let key = entity.key();
        let mut txn = Transaction::new(&self.store);
        txn.find(key.as_str())
            .do_not_found(self.store.put(entity)?);
        let existed = txn.commit(location, &deadline)?;

        tracing::debug!(location, key = %key, created = !existed, "create");
        Ok(!existed)
    }

    /// Store `entity` unconditionally; returns whether it overwrote a value
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn put<E: Entity>(&self, location: &str, entity: &E) -> CanopyResult<bool> {
        let deadline = self.deadline();
        self.put_at(location, &deadline, entity)
    }

    /// Load `entity` by key, apply `mutate` and store it back
    ///
    /// Returns `false` without calling `mutate` when the key is absent.
    /// Concurrent updates of the same key are last-commit-wins.
    ///
    /// # Errors
    ///
    /// Decode failures of the stored value are serialization errors; store
    /// failures are storage errors.
    pub fn update<E, F>(&self, location: &str, entity: &mut E, mutate: F) -> CanopyResult<bool>
    where
        E: Entity,
        F: FnOnce(&mut E),
    {
        let deadline = self.deadline();
        let key = entity.key();
        if !self.store.get(location, &deadline, &key, entity)? {
            tracing::debug!(location, key = %key, "update: entity not found");
            return Ok(false);
        }
        mutate(entity);
        self.put_at(location, &deadline, entity)
    }

    fn put_at<E: Entity>(&self, location: &str, deadline: &Deadline, entity: &E) -> CanopyResult<bool> {
        let key = entity.key();
        let mut txn = Transaction::new(&self.store);
        txn.find(key.as_str()).do_both(self.store.put(entity)?);
        let existed = txn.commit(location, deadline)?;

        tracing::debug!(location, key = %key, updated = existed, "put");
        Ok(existed)
    }

    // ========================================================================
    // Entities with a parent relation
    // ========================================================================

    /// Create `entity` together with its relation record and DLRel
    ///
    /// Nothing is written when the parent is absent.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_with_rel<E: EntityRelation>(
        &self,
        location: &str,
        entity: &E,
    ) -> CanopyResult<RelWrite> {
        let deadline = self.deadline();
        let parent_key = entity.parent_key();
        if !self.store.exists(location, &deadline, &parent_key)? {
            tracing::debug!(location, key = %entity.key(), parent = %parent_key, "create_with_rel: parent not found");
            return Ok(RelWrite::parent_missing());
        }

        let key = entity.key();
        let mut txn = Transaction::new(&self.store);
        txn.find(key.as_str()).do_not_found(self.store.put(entity)?);
        self.queue_new_edge(&mut txn, entity)?;
        let existed = txn.commit(location, &deadline)?;

        tracing::debug!(location, key = %key, parent = %parent_key, created = !existed, "create_with_rel");
        Ok(RelWrite {
            applied: !existed,
            parent_found: true,
        })
    }

    /// Upsert `entity`, maintaining its relation records
    ///
    /// When the stored copy exists and its `rel_name` differs from the
    /// incoming one, every relation of the entity is rewritten under the new
    /// name in the same commit, using [`EntityRelation::relink`]. The found
    /// branch is sized from the entity's DLRel rows, so any number of
    /// parents fits in that commit. When
    /// the entity is new, the parent must exist and the relation plus DLRel
    /// are created alongside it.
    ///
    /// # Errors
    ///
    /// See [`update`](Self::update).
    pub fn put_with_rel<E: EntityRelation>(
        &self,
        location: &str,
        entity: &E,
    ) -> CanopyResult<RelWrite> {
        let deadline = self.deadline();
        let key = entity.key();
        let mut stored = entity.empty();
        let found = self.store.get(location, &deadline, &key, &mut stored)?;

        let mut txn = if found && stored.rel_name() != entity.rel_name() {
            let dlrs = self.list_dlr_at(location, &deadline, &key)?;
            let mut txn = Transaction::with_branch_capacity(&self.store, relink_ops(dlrs.len()));
            txn.find(key.as_str()).do_both(self.store.put(entity)?);
            self.queue_relinks(&mut txn, entity, dlrs)?;
            tracing::debug!(
                location,
                key = %key,
                from = %stored.rel_name(),
                to = %entity.rel_name(),
                "put_with_rel: relinking"
            );
            txn
        } else {
            let mut txn = Transaction::new(&self.store);
            txn.find(key.as_str()).do_both(self.store.put(entity)?);
            txn
        };

        if !found {
            let parent_key = entity.parent_key();
            if !self.store.exists(location, &deadline, &parent_key)? {
                tracing::debug!(location, key = %key, parent = %parent_key, "put_with_rel: parent not found");
                return Ok(RelWrite::parent_missing());
            }
            self.queue_new_edge(&mut txn, entity)?;
        }

        let existed = txn.commit(location, &deadline)?;
        tracing::debug!(location, key = %key, updated = existed, "put_with_rel");
        Ok(RelWrite {
            applied: existed,
            parent_found: true,
        })
    }

    /// Add a further parent edge for an existing child
    ///
    /// Loads `child` from the store, checks that `parent_key` exists, applies
    /// `fill` (which points the child at the new parent in memory) and queues
    /// the relation record and DLRel gated on the relation key, so an edge
    /// that already exists is not rewritten. The child entity itself is not
    /// written.
    ///
    /// With `txn = Some(..)` the writes are queued on the caller's
    /// transaction (replacing its gate) and the caller commits; otherwise a
    /// fresh transaction is committed here.
    ///
    /// # Errors
    ///
    /// See [`update`](Self::update).
    pub fn link_to<E, F>(
        &self,
        location: &str,
        child: &mut E,
        parent_key: &str,
        fill: F,
        txn: Option<&mut Transaction>,
    ) -> CanopyResult<LinkOutcome>
    where
        E: EntityRelation,
        F: FnOnce(&mut E),
    {
        let deadline = self.deadline();
        let child_key = child.key();
        if !self.store.get(location, &deadline, &child_key, child)? {
            tracing::debug!(location, child = %child_key, "link_to: child not found");
            return Ok(LinkOutcome::missing(false));
        }
        if !self.store.exists(location, &deadline, parent_key)? {
            tracing::debug!(location, child = %child_key, parent = parent_key, "link_to: parent not found");
            return Ok(LinkOutcome::missing(true));
        }

        fill(child);
        let relation = child.link();
        let relation_key = relation.key();
        let dlr = DLRel::new(
            child.key(),
            child.parent_key(),
            child.link_name(),
            relation_key.as_str(),
        );
        let relation_op = self.store.put(relation.as_ref())?;
        let dlr_op = self.store.put(&dlr)?;

        match txn {
            Some(txn) => {
                if let Some(previous) = txn.gate() {
                    tracing::warn!(
                        location,
                        previous,
                        gate = %relation_key,
                        "link_to: replacing the gate of a caller transaction"
                    );
                }
                txn.find(relation_key.as_str())
                    .do_not_found(relation_op)
                    .do_not_found(dlr_op);
                tracing::debug!(location, relation = %relation_key, "link_to: queued on caller transaction");
            }
            None => {
                let mut own = Transaction::new(&self.store);
                own.find(relation_key.as_str())
                    .do_not_found(relation_op)
                    .do_not_found(dlr_op);
                let existed = own.commit(location, &deadline)?;
                tracing::debug!(location, relation = %relation_key, created = !existed, "link_to");
            }
        }

        Ok(LinkOutcome {
            child_found: true,
            parent_found: true,
            relation: Some(relation),
        })
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Every DLRel row of `child_key`, ordered by parent key
    ///
    /// # Errors
    ///
    /// Storage errors carry `location`; undecodable rows are serialization
    /// errors.
    pub fn list_dlr(&self, location: &str, child_key: &str) -> CanopyResult<Vec<DLRel>> {
        let deadline = self.deadline();
        self.list_dlr_at(location, &deadline, child_key)
    }

    fn list_dlr_at(
        &self,
        location: &str,
        deadline: &Deadline,
        child_key: &str,
    ) -> CanopyResult<Vec<DLRel>> {
        self.store.start_key(
            location,
            deadline,
            &DLRel::child_prefix(child_key),
            0,
            DLRel::default,
        )
    }

    /// Relation records of kind `tag` under `parent_key`, ordered by name
    ///
    /// At most `top` records are returned (`0` = all).
    ///
    /// # Errors
    ///
    /// See [`list_dlr`](Self::list_dlr).
    pub fn list_children(
        &self,
        location: &str,
        parent_key: &str,
        tag: &str,
        top: usize,
    ) -> CanopyResult<Vec<RelationRecord>> {
        let deadline = self.deadline();
        self.store.start_key(
            location,
            &deadline,
            &RelationRecord::children_prefix(parent_key, tag),
            top,
            RelationRecord::default,
        )
    }

    /// Like [`list_children`](Self::list_children) but starting at the
    /// relation key `cursor` (inclusive)
    ///
    /// # Errors
    ///
    /// See [`list_dlr`](Self::list_dlr).
    pub fn list_children_from(
        &self,
        location: &str,
        parent_key: &str,
        tag: &str,
        cursor: &str,
        top: usize,
    ) -> CanopyResult<Vec<RelationRecord>> {
        let deadline = self.deadline();
        self.store.range(
            location,
            &deadline,
            cursor,
            &RelationRecord::children_prefix(parent_key, tag),
            top,
            RelationRecord::default,
        )
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Queue the relation record and DLRel of a new child on the not-found branch
    fn queue_new_edge<E: EntityRelation>(&self, txn: &mut Transaction, entity: &E) -> CanopyResult<()> {
        let relation = entity.link();
        let dlr = DLRel::new(
            entity.key(),
            entity.parent_key(),
            entity.link_name(),
            relation.key(),
        );
        txn.do_not_found(self.store.put(relation.as_ref())?)
            .do_not_found(self.store.put(&dlr)?);
        Ok(())
    }

    /// Queue a rename of every relation in `dlrs` on the found branch
    ///
    /// For each row: delete the old relation, write the one rebuilt by
    /// `relink`, and point the DLRel at it.
    fn queue_relinks<E: EntityRelation>(
        &self,
        txn: &mut Transaction,
        entity: &E,
        dlrs: Vec<DLRel>,
    ) -> CanopyResult<()> {
        for mut dlr in dlrs {
            let relation = entity.relink(&dlr);
            txn.do_found(self.store.remove(dlr.pointer.as_str()));
            txn.do_found(self.store.put(relation.as_ref())?);
            dlr.pointer = relation.key();
            txn.do_found(self.store.put(&dlr)?);
        }
        Ok(())
    }
}

/// Found-branch operations for renaming an entity with `relations` edges:
/// the entity write, then delete + put + DLRel update per relation
fn relink_ops(relations: usize) -> usize {
    (1 + 3 * relations).max(DEFAULT_BRANCH_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relink_ops_grows_with_relations() {
        assert_eq!(relink_ops(0), DEFAULT_BRANCH_CAPACITY);
        assert_eq!(relink_ops(1), 4);
        assert_eq!(relink_ops(5), 16);
        assert_eq!(relink_ops(6), 19);
    }

    #[test]
    fn test_from_config_takes_timeout() {
        let config = EngineConfig {
            request_timeout_ms: 10,
        };
        let ops = CrudOperation::from_config(Store::in_memory(), &config);
        assert!(!ops.deadline().is_expired());
    }

    #[test]
    fn test_link_outcome_is_linked() {
        assert!(!LinkOutcome::missing(true).is_linked());
        assert!(!LinkOutcome::missing(false).is_linked());
    }

    #[test]
    fn test_debug_omits_timeout() {
        let ops = CrudOperation::new(Store::in_memory());
        let dbg = format!("{:?}", ops);
        assert!(dbg.contains("CrudOperation"));
        assert!(dbg.contains("store"));
    }
}
