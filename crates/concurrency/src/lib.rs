//! Concurrency layer for Canopy
//!
//! This crate implements the compare-and-branch transaction:
//! - Transaction: gate key + found / not-found operation sets
//! - One atomic backend commit per transaction
//! - Branch selection decided by the gate key's revision at commit time
//!
//! There is no retry and no lock held between reads and the commit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod transaction;

pub use transaction::{PendingOperations, Transaction, DEFAULT_BRANCH_CAPACITY};
