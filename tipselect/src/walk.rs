//! Weighted random walk from an entry point to a tip.

use crate::{Error, Hash, Metrics, TangleStore};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Walk-time validation of a candidate step.
///
/// Implementations are stateful across the calls of one walk and must be
/// constructed fresh per walk; state evolves only when a candidate is
/// accepted.
pub trait Validator {
    /// Whether the walk may step onto `candidate`.
    fn is_valid(&mut self, candidate: &Hash) -> Result<bool, Error>;
}

impl<V: Validator + ?Sized> Validator for &mut V {
    fn is_valid(&mut self, candidate: &Hash) -> Result<bool, Error> {
        (**self).is_valid(candidate)
    }
}

/// Performs weighted random walks toward the tips of the graph.
#[derive(Clone)]
pub struct Walker<S: TangleStore> {
    store: S,
    metrics: Metrics,
}

impl<S: TangleStore> Walker<S> {
    pub fn new(store: S, metrics: Metrics) -> Self {
        Self { store, metrics }
    }

    /// Walks from `entry_point` to a tip.
    ///
    /// At every step the walk considers the rated approvers of the current
    /// transaction and draws one with probability proportional to its
    /// weight. A candidate the validator rejects is only removed from the
    /// current step's draw; it may still be reached from another branch
    /// later. The walk ends at the current transaction once no rated
    /// approver remains, either because the frontier was reached or because
    /// every candidate was rejected.
    ///
    /// Candidates are considered in hash order, so a seeded `rng` makes the
    /// walk reproducible on an unchanged graph.
    pub fn walk<R: Rng, V: Validator>(
        &self,
        rng: &mut R,
        entry_point: Hash,
        ratings: &HashMap<Hash, u64>,
        mut validator: V,
    ) -> Result<Hash, Error> {
        let mut current = entry_point;
        let mut steps = 0u64;
        'walk: loop {
            let mut candidates: Vec<(Hash, u64)> = self
                .store
                .approvers(&current)?
                .into_iter()
                .filter_map(|hash| {
                    ratings
                        .get(&hash)
                        .filter(|weight| **weight > 0)
                        .map(|weight| (hash, *weight))
                })
                .collect();
            candidates.sort();

            while !candidates.is_empty() {
                let index = Self::draw(rng, &candidates);
                let (candidate, _) = candidates[index];
                if validator.is_valid(&candidate)? {
                    trace!(from = %current, to = %candidate, "step accepted");
                    self.metrics.steps.inc();
                    steps += 1;
                    current = candidate;
                    continue 'walk;
                }
                candidates.remove(index);
            }

            debug!(tip = %current, steps, "walk finished");
            self.metrics.walks.inc();
            return Ok(current);
        }
    }

    /// Weighted draw by cumulative scan over the candidate weights.
    fn draw<R: Rng>(rng: &mut R, candidates: &[(Hash, u64)]) -> usize {
        let total: u64 = candidates.iter().map(|(_, weight)| weight).sum();
        let mut roll = rng.gen_range(0..total);
        for (index, (_, weight)) in candidates.iter().enumerate() {
            if roll < *weight {
                return index;
            }
            roll -= weight;
        }
        candidates.len() - 1
    }
}
