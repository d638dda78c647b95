//! Cumulative weight rating.

use super::RatingCalculator;
use crate::{dag, Error, Hash, TangleStore};
use std::collections::{HashMap, HashSet, VecDeque};

/// Rates every transaction in the entry point's future cone with one plus the
/// number of distinct transactions approving it, biasing walks toward heavily
/// approved history.
///
/// Holds the future set of every cone member in memory while calculating, so
/// cost grows with the square of the cone in the worst case.
#[derive(Clone)]
pub struct CumulativeWeight<S: TangleStore> {
    store: S,
}

impl<S: TangleStore> CumulativeWeight<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TangleStore> RatingCalculator for CumulativeWeight<S> {
    fn calculate(&self, entry_point: &Hash) -> Result<HashMap<Hash, u64>, Error> {
        // collect the cone and the parent edges inside it
        let mut parents: HashMap<Hash, (Hash, Hash)> = HashMap::new();
        let mut visited = HashSet::from([*entry_point]);
        dag::traverse_approvers(
            &self.store,
            entry_point,
            |_| false,
            |tx| {
                parents.insert(tx.hash, (tx.trunk, tx.branch));
            },
            &mut visited,
        )?;

        // unprocessed in-cone approvers per member
        let mut pending: HashMap<Hash, usize> = parents.keys().map(|hash| (*hash, 0)).collect();
        pending.insert(*entry_point, 0);
        for (trunk, branch) in parents.values() {
            for parent in distinct(*trunk, *branch) {
                if let Some(count) = pending.get_mut(&parent) {
                    *count += 1;
                }
            }
        }

        // peel from the frontier inward, accumulating distinct future sets
        let mut queue: VecDeque<Hash> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(hash, _)| *hash)
            .collect();
        let mut futures: HashMap<Hash, HashSet<Hash>> = HashMap::new();
        let mut ratings = HashMap::new();
        while let Some(hash) = queue.pop_front() {
            let future = futures.remove(&hash).unwrap_or_default();
            ratings.insert(hash, 1 + future.len() as u64);
            let Some((trunk, branch)) = parents.get(&hash) else {
                // the entry point's parents are outside the cone
                continue;
            };
            for parent in distinct(*trunk, *branch) {
                let Some(count) = pending.get_mut(&parent) else {
                    continue;
                };
                let set = futures.entry(parent).or_default();
                set.insert(hash);
                set.extend(future.iter().copied());
                *count -= 1;
                if *count == 0 {
                    queue.push_back(parent);
                }
            }
        }
        Ok(ratings)
    }
}

fn distinct(trunk: Hash, branch: Hash) -> impl Iterator<Item = Hash> {
    let branch = (branch != trunk).then_some(branch);
    std::iter::once(trunk).chain(branch)
}
