//! Concurrent/Multi-threaded Tests for canopy-concurrency
//!
//! These tests verify correct behavior under actual concurrent execution:
//!
//! 1. **Create races** - only one "create iff absent" commit wins
//! 2. **Branch selection** - the gate is evaluated at commit time, not earlier
//! 3. **Atomicity** - readers never observe half of a branch
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test --test concurrent_tests
//! ```

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use canopy_concurrency::Transaction;
use canopy_core::Deadline;
use canopy_storage::{KvBackend, PendingOp, Store};

// ============================================================================
// Test Helpers
// ============================================================================

fn put(key: &str, value: &str) -> PendingOp {
    PendingOp::Put {
        key: key.as_bytes().to_vec(),
        value: value.as_bytes().to_vec(),
    }
}

fn value_of(store: &Store, key: &str) -> Option<Vec<u8>> {
    store
        .get_raw("test", &Deadline::never(), key)
        .unwrap()
        .map(|kv| kv.value)
}

// ============================================================================
// SECTION 1: Sequential branch semantics
// ============================================================================

mod branch_semantics {
    use super::*;

    #[test]
    fn test_not_found_branch_on_absent_gate() {
        let store = Store::in_memory();
        let mut txn = Transaction::new(&store);
        txn.find("k")
            .do_found(put("k", "updated"))
            .do_not_found(put("k", "created"));
        let existed = txn.commit("test", &Deadline::never()).unwrap();
        assert!(!existed);
        assert_eq!(value_of(&store, "k").unwrap(), b"created");
    }

    #[test]
    fn test_found_branch_on_present_gate() {
        let store = Store::in_memory();
        let mut first = Transaction::new(&store);
        first.find("k").do_not_found(put("k", "v1"));
        first.commit("test", &Deadline::never()).unwrap();

        let mut second = Transaction::new(&store);
        second
            .find("k")
            .do_found(put("k", "v2"))
            .do_not_found(put("k", "never"));
        assert!(second.commit("test", &Deadline::never()).unwrap());
        assert_eq!(value_of(&store, "k").unwrap(), b"v2");
    }

    #[test]
    fn test_gate_may_differ_from_written_keys() {
        let store = Store::in_memory();
        let mut txn = Transaction::new(&store);
        txn.find("owner")
            .do_found(put("child", "rewritten"))
            .do_not_found(put("other", "x"));
        assert!(!txn.commit("test", &Deadline::never()).unwrap());
        assert!(value_of(&store, "child").is_none());
        assert_eq!(value_of(&store, "other").unwrap(), b"x");
    }

    #[test]
    fn test_gate_evaluated_at_commit_not_at_queue_time() {
        let store = Store::in_memory();
        let mut txn = Transaction::new(&store);
        txn.find("k")
            .do_found(put("result", "found"))
            .do_not_found(put("result", "not-found"));

        // Another writer creates the gate after ops were queued
        let mut racer = Transaction::new(&store);
        racer.find("k").do_not_found(put("k", "racer"));
        racer.commit("racer", &Deadline::never()).unwrap();

        assert!(txn.commit("test", &Deadline::never()).unwrap());
        assert_eq!(value_of(&store, "result").unwrap(), b"found");
    }

    #[test]
    fn test_expired_deadline_applies_nothing() {
        let store = Store::in_memory();
        let mut txn = Transaction::new(&store);
        txn.find("k").do_not_found(put("k", "v"));
        let err = txn
            .commit("space.create", &Deadline::after(std::time::Duration::ZERO))
            .unwrap_err();
        assert!(err.is_deadline_exceeded());
        assert!(err.to_string().contains("space.create"));
        assert!(value_of(&store, "k").is_none());
        assert_eq!(store.revision(), 0);
    }
}

// ============================================================================
// SECTION 2: Concurrent create races
// ============================================================================

mod create_races {
    use super::*;

    /// N threads race to create the same key; exactly one wins and its
    /// payload is the one stored.
    #[test]
    fn test_exactly_one_create_wins() {
        const THREADS: usize = 8;
        let store = Store::in_memory();
        let barrier = Arc::new(Barrier::new(THREADS));
        let winners = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let store = store.clone();
                let barrier = Arc::clone(&barrier);
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    let mut txn = Transaction::new(&store);
                    txn.find("contested")
                        .do_not_found(put("contested", &format!("writer-{i}")));
                    barrier.wait();
                    let existed = txn.commit("race", &Deadline::never()).unwrap();
                    if !existed {
                        winners.lock().push(i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let winners = winners.lock();
        assert_eq!(winners.len(), 1);
        let expected = format!("writer-{}", winners[0]);
        assert_eq!(value_of(&store, "contested").unwrap(), expected.as_bytes());
    }

    /// Upserts racing on one key: exactly one thread sees "created", the
    /// rest see "updated".
    #[test]
    fn test_upsert_flags_partition_threads() {
        const THREADS: usize = 6;
        let store = Store::in_memory();
        let barrier = Arc::new(Barrier::new(THREADS));
        let created = Arc::new(AtomicUsize::new(0));
        let updated = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let store = store.clone();
                let barrier = Arc::clone(&barrier);
                let created = Arc::clone(&created);
                let updated = Arc::clone(&updated);
                thread::spawn(move || {
                    let value = format!("v{i}");
                    let mut txn = Transaction::new(&store);
                    txn.find("k").do_both(put("k", &value));
                    barrier.wait();
                    if txn.commit("race", &Deadline::never()).unwrap() {
                        updated.fetch_add(1, Ordering::SeqCst);
                    } else {
                        created.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(updated.load(Ordering::SeqCst), THREADS - 1);
        let kv = store.get_raw("test", &Deadline::never(), "k").unwrap().unwrap();
        assert_eq!(kv.version, THREADS as u64);
    }
}

// ============================================================================
// SECTION 3: Atomic visibility
// ============================================================================

mod atomicity {
    use super::*;

    /// A reader scanning concurrently with multi-key commits sees either all
    /// or none of each commit's keys.
    #[test]
    fn test_readers_never_see_partial_branch() {
        let store = Store::in_memory();
        let writer_store = store.clone();

        let writer = thread::spawn(move || {
            for i in 0..200 {
                let mut txn = Transaction::new(&writer_store);
                let gate = format!("g{i:03}");
                txn.find(gate.clone())
                    .do_not_found(put(&format!("{gate}/a"), "1"))
                    .do_not_found(put(&format!("{gate}/b"), "1"))
                    .do_not_found(put(&format!("{gate}/c"), "1"));
                txn.commit("writer", &Deadline::never()).unwrap();
            }
        });

        for _ in 0..200 {
            let rows = store
                .backend()
                .scan(&Deadline::never(), b"g", None, 0)
                .unwrap();
            assert_eq!(rows.len() % 3, 0, "observed a partial commit");
        }
        writer.join().unwrap();
        assert_eq!(store.revision(), 200);
    }
}
