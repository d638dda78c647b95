//! Select and validate tips on a DAG ledger.
//!
//! Each transaction on the ledger references two parent transactions (its
//! trunk and branch), forming a directed acyclic graph whose consensus state
//! emerges incrementally. Before attaching a new transaction, a node must
//! decide which recent transactions ("tips") are safe to build on. This crate
//! implements that decision: entry point selection at a configurable depth,
//! rating computation over the candidate subgraph, a weighted random walk
//! from entry point to tip, and walk-time validation of solidity, bundle
//! position, depth, and ledger consistency.
//!
//! # Status
//!
//! `weft-tipselect` is **ALPHA** software and is not yet recommended for
//! production use. Developers should expect breaking changes and occasional
//! instability.
//!
//! # Design
//!
//! The engine consumes storage, snapshots, round lookups, and ledger
//! semantics as black boxes behind the [TangleStore], [SnapshotView],
//! [RoundOracle], and [LedgerView] traits. All randomness is drawn from a
//! caller-provided [rand::Rng], so a seeded generator reproduces a walk
//! exactly.
//!
//! Traversal, rating, and walking are pure over the storage snapshot they
//! read and are safe to invoke concurrently as long as each call owns its
//! visited set and its [validator::WalkValidator]. A validator holds
//! walk-local mutable state (a depth memoization set and a ledger-diff
//! accumulator) and must never be shared across concurrent walks.
//!
//! # Example
//!
//! ```ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use weft_tipselect::{rating::RatingOne, selector::TipSelector, Config, Metrics};
//!
//! let rating = RatingOne::new(store.clone());
//! let selector = TipSelector::new(
//!     store,
//!     snapshot,
//!     rounds,
//!     ledger,
//!     rating,
//!     Config::default(),
//!     Metrics::new(&mut registry),
//! );
//! let mut rng = StdRng::seed_from_u64(42);
//! let tips = selector.tips(&mut rng, 3, None)?;
//! ```

use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub mod config;
pub use config::Config;
pub mod dag;
pub mod entry;
pub mod metrics;
pub use metrics::Metrics;
#[cfg(test)]
pub mod mocks;
pub mod rating;
pub mod selector;
pub mod types;
pub use types::{Address, Hash, Round, RoundIndex, Transaction};
pub mod validator;
pub mod walk;

/// Errors that can occur while selecting tips.
///
/// Validation rejections are not errors: a candidate failing a walk-time
/// check is an ordinary `false` outcome. Errors are reserved for failures
/// that would leave the engine with a partial view of the graph, which must
/// never silently influence which tip is selected.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced transaction could not be loaded from the store.
    #[error("missing transaction: {0}")]
    MissingTransaction(Hash),
    /// The backing store failed.
    #[error("store failure: {0}")]
    Store(String),
    /// The ledger collaborator failed.
    #[error("ledger failure: {0}")]
    Ledger(String),
    /// A requested reference transaction is not part of the rating batch
    /// (it is too old or does not approve the entry point).
    #[error("reference transaction not in rating batch: {0}")]
    InvalidReference(Hash),
    /// Tips selected by independent walks conflict with each other.
    #[error("selected tips are not consistent")]
    InconsistentTips,
}

/// A read-only view over stored transactions and their reverse adjacency.
///
/// The approver index is a storage-maintained secondary index mapping a hash
/// to the set of hashes that directly reference it as trunk or branch.
/// Implementations must resolve both lookups against the same point-in-time
/// view; the engine never writes through this trait.
pub trait TangleStore: Clone + Send + 'static {
    /// Resolves a hash to its stored transaction, or `None` if the
    /// transaction is unknown or only requested (a placeholder).
    fn transaction(&self, hash: &Hash) -> Result<Option<Transaction>, Error>;

    /// Enumerates the direct approvers of a hash.
    fn approvers(&self, hash: &Hash) -> Result<HashSet<Hash>, Error>;
}

/// Read-only bounds of the snapshotted ledger state.
pub trait SnapshotView: Clone + Send + 'static {
    /// Index of the earliest round still retained locally.
    fn earliest_retained(&self) -> RoundIndex;

    /// Index of the latest confirmed round.
    fn latest_confirmed(&self) -> RoundIndex;

    /// Hash recorded by the latest snapshot, used as the entry point when no
    /// confirmed round can be found.
    fn latest_hash(&self) -> Hash;

    /// The recorded solid entry points: hashes at the snapshot boundary whose
    /// history has been pruned, each with the round that confirmed it.
    fn solid_entry_points(&self) -> HashMap<Hash, RoundIndex>;
}

/// Lookup of confirmed rounds by index.
pub trait RoundOracle: Clone + Send + 'static {
    /// Returns the nearest confirming round at or after `index`, if one
    /// exists.
    fn closest_round(&self, index: RoundIndex) -> Result<Option<Round>, Error>;
}

/// The ledger semantics consulted during a walk.
///
/// The engine tracks which hashes a walk has approved and the net balance
/// delta those approvals imply; this trait is the sole owner of what those
/// deltas are and whether they stay consistent.
pub trait LedgerView: Clone + Send + 'static {
    /// Folds the balance effect of `tip`'s bundle into `diff`, extending
    /// `approved` with the transactions counted, and reports whether the
    /// result stays consistent with the confirmed baseline.
    ///
    /// Both accumulators are mutated only when the fold succeeds; on a
    /// `false` outcome they are left exactly as passed in.
    fn fold_diff(
        &self,
        approved: &mut HashSet<Hash>,
        diff: &mut HashMap<Address, i64>,
        tip: &Hash,
    ) -> Result<bool, Error>;
}
