//! Uniform rating.

use super::RatingCalculator;
use crate::{dag, Error, Hash, TangleStore};
use std::collections::{HashMap, HashSet};

/// Rates every transaction in the entry point's future cone with a weight of
/// one, producing uniform random walks.
#[derive(Clone)]
pub struct RatingOne<S: TangleStore> {
    store: S,
}

impl<S: TangleStore> RatingOne<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TangleStore> RatingCalculator for RatingOne<S> {
    fn calculate(&self, entry_point: &Hash) -> Result<HashMap<Hash, u64>, Error> {
        let mut ratings = HashMap::from([(*entry_point, 1)]);
        let mut visited = HashSet::from([*entry_point]);
        dag::traverse_approvers(
            &self.store,
            entry_point,
            |_| false,
            |tx| {
                ratings.insert(tx.hash, 1);
            },
            &mut visited,
        )?;
        Ok(ratings)
    }
}
