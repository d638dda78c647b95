//! Rating strategies for the random walk.
//!
//! A rating batch maps every transaction that transitively approves the entry
//! point (and the entry point itself) to an unnormalized sampling weight. The
//! walker treats the batch as opaque: swapping the strategy changes the
//! walk's bias without touching anything else.

use crate::{Error, Hash};
use std::collections::HashMap;

mod one;
pub use one::RatingOne;
mod cumulative;
pub use cumulative::CumulativeWeight;

/// Computes sampling weights over the future cone of an entry point.
pub trait RatingCalculator {
    /// Returns a weight for the entry point and every transaction that
    /// transitively approves it. Every weight is at least one.
    fn calculate(&self, entry_point: &Hash) -> Result<HashMap<Hash, u64>, Error>;
}
