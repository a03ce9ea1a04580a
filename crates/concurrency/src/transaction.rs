//! Compare-and-branch transaction
//!
//! A [`Transaction`] gates on the existence of exactly one key and carries two
//! operation sets. At commit the backend checks the gate key's modification
//! revision and applies exactly one set:
//!
//! ```text
//! mod_revision(gate) > 0   ->  found branch
//! mod_revision(gate) == 0  ->  not-found branch
//! ```
//!
//! This is the only concurrency-control primitive of the engine: "create iff
//! absent", "update iff present" and "rewrite related rows iff the owner is
//! present" are all one commit, so the store's state at commit time, not at
//! an earlier read, decides the outcome.
//!
//! ## Contract violations
//!
//! The following are coding defects in the caller and panic:
//! - committing without a gate key
//! - committing with no queued operation in either branch
//! - queuing more operations than the branch capacity (4 by default)

use std::sync::Arc;

use smallvec::SmallVec;

use canopy_core::{CanopyError, CanopyResult, Deadline};
use canopy_storage::{KvBackend, PendingOp, RevisionCompare, Store, TxnRequest};

/// Default number of operations each branch may hold
pub const DEFAULT_BRANCH_CAPACITY: usize = 4;

type Branch = SmallVec<[PendingOp; DEFAULT_BRANCH_CAPACITY]>;

/// Summary of queued operations per branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperations {
    /// Operations queued for the found branch
    pub found: usize,
    /// Operations queued for the not-found branch
    pub not_found: usize,
}

impl PendingOperations {
    /// Total number of queued operations
    pub fn total(&self) -> usize {
        self.found + self.not_found
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A single compare-and-branch commit under construction
#[derive(Debug)]
pub struct Transaction {
    backend: Arc<dyn KvBackend>,
    gate: Option<String>,
    found: Branch,
    not_found: Branch,
    capacity: usize,
}

impl Transaction {
    /// New transaction against `store`'s backend with the default capacity
    pub fn new(store: &Store) -> Self {
        Self::with_branch_capacity(store, DEFAULT_BRANCH_CAPACITY)
    }

    /// New transaction whose branches each accept up to `capacity` operations
    ///
    /// Branches beyond [`DEFAULT_BRANCH_CAPACITY`] spill to the heap.
    pub fn with_branch_capacity(store: &Store, capacity: usize) -> Self {
        Transaction {
            backend: Arc::clone(store.backend()),
            gate: None,
            found: SmallVec::new(),
            not_found: SmallVec::new(),
            capacity,
        }
    }

    /// Designate the key whose existence selects the branch
    ///
    /// Calling again replaces the previous gate.
    pub fn find(&mut self, gate: impl Into<String>) -> &mut Self {
        self.gate = Some(gate.into());
        self
    }

    /// Current gate key, if any
    pub fn gate(&self) -> Option<&str> {
        self.gate.as_deref()
    }

    /// Queue an operation for when the gate key exists
    ///
    /// # Panics
    ///
    /// Panics if the found branch is already at capacity.
    pub fn do_found(&mut self, op: PendingOp) -> &mut Self {
        Self::push(&mut self.found, self.capacity, "found", op);
        self
    }

    /// Queue an operation for when the gate key is absent
    ///
    /// # Panics
    ///
    /// Panics if the not-found branch is already at capacity.
    pub fn do_not_found(&mut self, op: PendingOp) -> &mut Self {
        Self::push(&mut self.not_found, self.capacity, "not-found", op);
        self
    }

    /// Queue the same operation on both branches
    ///
    /// # Panics
    ///
    /// Panics if either branch is already at capacity.
    pub fn do_both(&mut self, op: PendingOp) -> &mut Self {
        self.do_found(op.clone());
        self.do_not_found(op)
    }

    /// Operations queued so far
    pub fn pending(&self) -> PendingOperations {
        PendingOperations {
            found: self.found.len(),
            not_found: self.not_found.len(),
        }
    }

    /// Branch capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run the transaction; returns whether the gate key existed
    ///
    /// # Errors
    ///
    /// Backend failures (including an expired deadline) are returned as
    /// storage errors tagged with `location` and the gate key. A gate that did
    /// not match the caller's expectation is not an error.
    ///
    /// # Panics
    ///
    /// Panics if no gate key was set or no operation was queued.
    pub fn commit(self, location: &str, deadline: &Deadline) -> CanopyResult<bool> {
        let Some(gate) = self.gate.as_deref() else {
            panic!("transaction committed without a gate key ({location})");
        };
        assert!(
            !self.pending().is_empty(),
            "transaction on '{gate}' committed with no queued operation ({location})"
        );

        let response = self
            .backend
            .txn(
                deadline,
                TxnRequest {
                    key: gate.as_bytes(),
                    compare: RevisionCompare::Exists,
                    success: &self.found,
                    failure: &self.not_found,
                },
            )
            .map_err(|e| CanopyError::storage(location, gate, e))?;

        tracing::debug!(
            location,
            gate,
            found = response.succeeded,
            revision = response.revision,
            ops = if response.succeeded { self.found.len() } else { self.not_found.len() },
            "transaction committed"
        );
        Ok(response.succeeded)
    }

    fn push(branch: &mut Branch, capacity: usize, name: &str, op: PendingOp) {
        assert!(
            branch.len() < capacity,
            "{name} branch is full ({capacity} operations)"
        );
        branch.push(op);
    }
}
