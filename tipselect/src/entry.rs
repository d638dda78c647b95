//! Entry point selection for the random walk.

use crate::{Error, Hash, RoundOracle, SnapshotView};
use rand::Rng;
use tracing::debug;

/// Picks the transaction a walk starts from: a hash confirmed roughly `depth`
/// rounds behind the latest confirmed round.
#[derive(Clone)]
pub struct EntryPointSelector<P: SnapshotView, O: RoundOracle> {
    snapshot: P,
    oracle: O,
}

impl<P: SnapshotView, O: RoundOracle> EntryPointSelector<P, O> {
    pub fn new(snapshot: P, oracle: O) -> Self {
        Self { snapshot, oracle }
    }

    /// Returns the hash of a transaction confirmed at or after
    /// `max(latest_confirmed - depth - 1, earliest_retained)`.
    ///
    /// When the round confirmed several hashes, one is picked uniformly at
    /// random so that distinct nodes do not converge on an identical walk
    /// start. Falls back to the latest snapshot hash when no confirming round
    /// exists at or after the target.
    pub fn entry_point<R: Rng>(&self, rng: &mut R, depth: u64) -> Result<Hash, Error> {
        let target = self
            .snapshot
            .latest_confirmed()
            .saturating_sub(depth.saturating_add(1))
            .max(self.snapshot.earliest_retained());
        if let Some(round) = self.oracle.closest_round(target)? {
            if !round.confirmed.is_empty() {
                let confirmed: Vec<Hash> = round.confirmed.iter().copied().collect();
                let entry_point = confirmed[rng.gen_range(0..confirmed.len())];
                debug!(round = round.index, hash = %entry_point, "entry point selected");
                return Ok(entry_point);
            }
        }

        let entry_point = self.snapshot.latest_hash();
        debug!(hash = %entry_point, "no confirming round at target, using snapshot hash");
        Ok(entry_point)
    }
}
