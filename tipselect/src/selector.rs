//! Tip selection service.

use crate::entry::EntryPointSelector;
use crate::rating::RatingCalculator;
use crate::validator::WalkValidator;
use crate::walk::Walker;
use crate::{
    Config, Error, Hash, LedgerView, Metrics, RoundOracle, SnapshotView, TangleStore,
};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Selects the tips a new transaction should approve.
///
/// One request resolves an entry point, computes one rating batch over its
/// future cone, and runs one weighted random walk per requested tip, each
/// with a fresh [WalkValidator]. Because the validators are independent, the
/// selected tips are re-checked against each other through the ledger before
/// they are returned.
pub struct TipSelector<S, P, O, L, C>
where
    S: TangleStore,
    P: SnapshotView,
    O: RoundOracle,
    L: LedgerView,
    C: RatingCalculator,
{
    store: S,
    snapshot: P,
    ledger: L,
    rating: C,
    entry: EntryPointSelector<P, O>,
    walker: Walker<S>,
    config: Config,
    metrics: Metrics,
}

impl<S, P, O, L, C> TipSelector<S, P, O, L, C>
where
    S: TangleStore,
    P: SnapshotView,
    O: RoundOracle,
    L: LedgerView,
    C: RatingCalculator,
{
    pub fn new(
        store: S,
        snapshot: P,
        oracle: O,
        ledger: L,
        rating: C,
        config: Config,
        metrics: Metrics,
    ) -> Self {
        Self {
            entry: EntryPointSelector::new(snapshot.clone(), oracle),
            walker: Walker::new(store.clone(), metrics.clone()),
            store,
            snapshot,
            ledger,
            rating,
            config,
            metrics,
        }
    }

    /// Returns the configured number of tips for a new transaction to
    /// approve.
    ///
    /// `depth` controls how far behind the latest confirmed round the walks
    /// start and is capped at the configured max depth. When `reference` is
    /// given, every walk after the first starts from it instead of the entry
    /// point, tying the selection to that transaction; a reference outside
    /// the rating batch fails with [Error::InvalidReference].
    pub fn tips<R: Rng>(
        &self,
        rng: &mut R,
        depth: u64,
        reference: Option<Hash>,
    ) -> Result<Vec<Hash>, Error> {
        let depth = depth.min(self.config.max_depth);
        let entry_point = self.entry.entry_point(rng, depth)?;
        let ratings = self.rating.calculate(&entry_point)?;
        debug!(entry_point = %entry_point, rated = ratings.len(), "rating batch computed");

        if let Some(reference) = reference {
            if !ratings.contains_key(&reference) {
                return Err(Error::InvalidReference(reference));
            }
        }

        let mut tips = Vec::with_capacity(self.config.tips_per_request);
        for walked in 0..self.config.tips_per_request {
            let start = match (walked, reference) {
                (0, _) | (_, None) => entry_point,
                (_, Some(reference)) => reference,
            };
            let mut validator = WalkValidator::new(
                self.store.clone(),
                self.snapshot.clone(),
                self.ledger.clone(),
                self.config.clone(),
                self.metrics.clone(),
            );
            tips.push(self.walker.walk(rng, start, &ratings, &mut validator)?);
        }

        // each walk was consistent on its own; make sure the set is too
        let mut approved = HashSet::new();
        let mut diff = HashMap::new();
        for tip in &tips {
            if !self.ledger.fold_diff(&mut approved, &mut diff, tip)? {
                return Err(Error::InconsistentTips);
            }
        }
        Ok(tips)
    }
}
