//! Key-value substrate contract
//!
//! A backend is an ordered, revision-versioned byte store. Every committed
//! transaction advances a global revision; each key remembers the revision
//! that created it and the one that last modified it. An absent key has
//! `mod_revision == 0`, which is what compare-and-branch commits test.

use std::fmt;

use canopy_core::{BackendError, Deadline};

/// A write or delete that has not been applied yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    /// Store `value` under `key`
    Put {
        /// Target key
        key: Vec<u8>,
        /// Encoded payload
        value: Vec<u8>,
    },
    /// Remove `key` (no-op if absent)
    Delete {
        /// Target key
        key: Vec<u8>,
    },
}

impl PendingOp {
    /// Key this operation targets
    pub fn key(&self) -> &[u8] {
        match self {
            PendingOp::Put { key, .. } | PendingOp::Delete { key } => key,
        }
    }

    /// True for a delete
    pub fn is_delete(&self) -> bool {
        matches!(self, PendingOp::Delete { .. })
    }
}

/// A stored key with its revision metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Key bytes
    pub key: Vec<u8>,
    /// Payload bytes
    pub value: Vec<u8>,
    /// Revision of the transaction that created the key
    pub create_revision: u64,
    /// Revision of the transaction that last wrote the key
    pub mod_revision: u64,
    /// Number of writes since creation (1 after the first write)
    pub version: u64,
}

/// Condition tested against one key's modification revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionCompare {
    /// `mod_revision > 0`: the key exists
    Exists,
    /// `mod_revision == 0`: the key is absent
    Absent,
}

/// A compare-and-branch request
///
/// If the compare holds, `success` runs; otherwise `failure` runs. Either way
/// the chosen branch is applied atomically under a single new revision.
#[derive(Debug, Clone, Copy)]
pub struct TxnRequest<'a> {
    /// Key whose revision is compared
    pub key: &'a [u8],
    /// Condition on that key
    pub compare: RevisionCompare,
    /// Operations applied when the condition holds
    pub success: &'a [PendingOp],
    /// Operations applied otherwise
    pub failure: &'a [PendingOp],
}

/// Outcome of a compare-and-branch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxnResponse {
    /// Whether the compare held (the success branch ran)
    pub succeeded: bool,
    /// Store revision after the transaction
    pub revision: u64,
}

/// Storage abstraction over an ordered, revisioned key-value substrate
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait KvBackend: Send + Sync + fmt::Debug {
    /// Exact-match read
    fn get(&self, deadline: &Deadline, key: &[u8]) -> Result<Option<KeyValue>, BackendError>;

    /// Ascending scan starting at `from` (inclusive)
    ///
    /// `end` is an exclusive upper bound (`None` = unbounded); `limit == 0`
    /// means no limit.
    fn scan(
        &self,
        deadline: &Deadline,
        from: &[u8],
        end: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<KeyValue>, BackendError>;

    /// Atomically evaluate the compare and apply exactly one branch
    fn txn(&self, deadline: &Deadline, request: TxnRequest<'_>) -> Result<TxnResponse, BackendError>;

    /// Current store revision
    fn revision(&self) -> u64;

    /// Close the backend; later calls fail with [`BackendError::Closed`]
    fn close(&self) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_backend_object_safe(_: &dyn KvBackend) {}

    #[test]
    fn test_pending_op_key() {
        let put = PendingOp::Put {
            key: b"a".to_vec(),
            value: b"1".to_vec(),
        };
        let del = PendingOp::Delete { key: b"b".to_vec() };
        assert_eq!(put.key(), b"a");
        assert_eq!(del.key(), b"b");
        assert!(!put.is_delete());
        assert!(del.is_delete());
    }
}
