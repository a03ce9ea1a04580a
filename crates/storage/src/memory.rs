//! MemoryBackend: in-process reference backend
//!
//! This module implements [`KvBackend`] using:
//! - `BTreeMap<Vec<u8>, Revisioned>` for ordered key storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for the global revision counter
//!
//! # Design Notes
//!
//! - **No history**: each key stores only its latest value and revisions
//! - **Revision allocation under the write lock**: a transaction's compare,
//!   branch selection and application all happen while holding the lock, so
//!   no reader can observe a half-applied branch
//! - **Empty branches do not bump the revision**

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;

use canopy_core::{BackendError, Deadline};

use crate::backend::{KeyValue, KvBackend, PendingOp, RevisionCompare, TxnRequest, TxnResponse};

#[derive(Debug, Clone)]
struct Revisioned {
    value: Vec<u8>,
    create_revision: u64,
    mod_revision: u64,
    version: u64,
}

impl Revisioned {
    fn to_key_value(&self, key: &[u8]) -> KeyValue {
        KeyValue {
            key: key.to_vec(),
            value: self.value.clone(),
            create_revision: self.create_revision,
            mod_revision: self.mod_revision,
            version: self.version,
        }
    }
}

/// Thread-safe in-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<BTreeMap<Vec<u8>, Revisioned>>,
    revision: AtomicU64,
    closed: AtomicBool,
}

impl MemoryBackend {
    /// Create a new empty backend at revision 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True when no key is stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn check(&self, deadline: &Deadline) -> Result<(), BackendError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BackendError::Closed);
        }
        if deadline.is_expired() {
            return Err(BackendError::DeadlineExceeded);
        }
        Ok(())
    }

    fn apply(data: &mut BTreeMap<Vec<u8>, Revisioned>, ops: &[PendingOp], revision: u64) {
        for op in ops {
            match op {
                PendingOp::Put { key, value } => match data.get_mut(key) {
                    Some(existing) => {
                        existing.value = value.clone();
                        existing.mod_revision = revision;
                        existing.version += 1;
                    }
                    None => {
                        data.insert(
                            key.clone(),
                            Revisioned {
                                value: value.clone(),
                                create_revision: revision,
                                mod_revision: revision,
                                version: 1,
                            },
                        );
                    }
                },
                PendingOp::Delete { key } => {
                    data.remove(key);
                }
            }
        }
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, deadline: &Deadline, key: &[u8]) -> Result<Option<KeyValue>, BackendError> {
        self.check(deadline)?;
        let data = self.data.read();
        Ok(data.get(key).map(|rv| rv.to_key_value(key)))
    }

    fn scan(
        &self,
        deadline: &Deadline,
        from: &[u8],
        end: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<KeyValue>, BackendError> {
        self.check(deadline)?;
        if matches!(end, Some(end) if end <= from) {
            return Ok(Vec::new());
        }
        let upper = match end {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        let take = if limit == 0 { usize::MAX } else { limit };

        let data = self.data.read();
        let results = data
            .range::<[u8], _>((Bound::Included(from), upper))
            .take(take)
            .map(|(k, rv)| rv.to_key_value(k))
            .collect();
        Ok(results)
    }

    fn txn(&self, deadline: &Deadline, request: TxnRequest<'_>) -> Result<TxnResponse, BackendError> {
        self.check(deadline)?;

        let mut data = self.data.write();
        let mod_revision = data.get(request.key).map_or(0, |rv| rv.mod_revision);
        let succeeded = match request.compare {
            RevisionCompare::Exists => mod_revision > 0,
            RevisionCompare::Absent => mod_revision == 0,
        };
        let ops = if succeeded {
            request.success
        } else {
            request.failure
        };

        let revision = if ops.is_empty() {
            self.revision.load(Ordering::SeqCst)
        } else {
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            Self::apply(&mut data, ops, revision);
            revision
        };

        Ok(TxnResponse {
            succeeded,
            revision,
        })
    }

    fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    fn close(&self) -> Result<(), BackendError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
