//! Walk-time validation of candidate steps.

use crate::metrics::{Rejection, Rule};
use crate::{
    dag, walk, Address, Config, Error, Hash, LedgerView, Metrics, RoundIndex, SnapshotView,
    TangleStore, Transaction,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Validates the candidates of one walk.
///
/// A candidate is accepted only if it is known, a bundle tail, solid, not
/// below max depth, and consistent with the ledger given everything the walk
/// has already approved. The validator accumulates walk-local state (a
/// below-max-depth memoization set and a ledger-diff accumulator) across
/// accepted candidates; construct a fresh one per walk and never share it
/// across concurrent walks.
pub struct WalkValidator<S: TangleStore, P: SnapshotView, L: LedgerView> {
    store: S,
    snapshot: P,
    ledger: L,
    config: Config,
    metrics: Metrics,

    max_depth_ok: HashSet<Hash>,
    approved: HashSet<Hash>,
    diff: HashMap<Address, i64>,
}

impl<S: TangleStore, P: SnapshotView, L: LedgerView> WalkValidator<S, P, L> {
    pub fn new(store: S, snapshot: P, ledger: L, config: Config, metrics: Metrics) -> Self {
        Self {
            store,
            snapshot,
            ledger,
            config,
            metrics,
            max_depth_ok: HashSet::new(),
            approved: HashSet::new(),
            diff: HashMap::new(),
        }
    }

    /// Whether the candidate's unconfirmed ancestry anchors below `allowed`.
    ///
    /// Scans backward over unconfirmed history, stopping at confirmed
    /// transactions and recorded solid entry points, and rejecting once the
    /// scan reaches anything confirmed before `allowed` or exceeds the
    /// configured transaction ceiling. A passing scan folds every transaction
    /// it analyzed into the memoization set, so overlapping ancestor chains
    /// are walked at most once per validator.
    fn below_max_depth(&mut self, tx: &Transaction, allowed: RoundIndex) -> Result<bool, Error> {
        if let Some(round) = tx.confirmed {
            return Ok(round < allowed);
        }
        if self.max_depth_ok.contains(&tx.hash) {
            return Ok(false);
        }

        let solid_entry_points = self.snapshot.solid_entry_points();
        let mut analyzed = self.max_depth_ok.clone();
        analyzed.extend(solid_entry_points.keys().copied());

        let limit = self.config.max_analyzed_transactions;
        let mut scanned = 0usize;
        let mut too_old = false;
        let mut exhausted = false;
        dag::traverse_approvees(
            &self.store,
            &tx.hash,
            |ancestor| {
                if too_old || exhausted {
                    return true;
                }
                scanned += 1;
                if scanned > limit {
                    exhausted = true;
                    return true;
                }
                if let Some(round) = ancestor.confirmed {
                    if round < allowed {
                        too_old = true;
                    }
                    // never scan past confirmed history
                    return true;
                }
                for parent in [ancestor.trunk, ancestor.branch] {
                    if solid_entry_points
                        .get(&parent)
                        .is_some_and(|round| *round < allowed)
                    {
                        // bottoms out at pruned history behind the boundary
                        too_old = true;
                        return true;
                    }
                }
                false
            },
            |ancestor| trace!(hash = %ancestor.hash, "analyzed"),
            &mut analyzed,
        )?;

        if exhausted {
            debug!(hash = %tx.hash, limit, "below max depth: scan exceeded transaction ceiling");
            return Ok(true);
        }
        if too_old {
            debug!(hash = %tx.hash, allowed, "below max depth: ancestry anchors behind allowed round");
            return Ok(true);
        }
        self.max_depth_ok = analyzed;
        Ok(false)
    }

    fn reject(&self, candidate: &Hash, rule: Rule) -> bool {
        debug!(hash = %candidate, ?rule, "validation failed");
        self.metrics
            .rejections
            .get_or_create(&Rejection::new(rule))
            .inc();
        false
    }
}

impl<S: TangleStore, P: SnapshotView, L: LedgerView> walk::Validator for WalkValidator<S, P, L> {
    fn is_valid(&mut self, candidate: &Hash) -> Result<bool, Error> {
        let Some(tx) = self.store.transaction(candidate)? else {
            return Ok(self.reject(candidate, Rule::Missing));
        };
        if !tx.is_tail() {
            return Ok(self.reject(candidate, Rule::NotTail));
        }
        if !tx.solid {
            return Ok(self.reject(candidate, Rule::NotSolid));
        }
        let allowed = self
            .snapshot
            .latest_confirmed()
            .saturating_sub(self.config.max_depth);
        if self.below_max_depth(&tx, allowed)? {
            return Ok(self.reject(candidate, Rule::BelowMaxDepth));
        }
        if !self
            .ledger
            .fold_diff(&mut self.approved, &mut self.diff, candidate)?
        {
            return Ok(self.reject(candidate, Rule::Ledger));
        }
        Ok(true)
    }
}
