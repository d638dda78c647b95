//! Breadth-first traversal over the transaction graph.
//!
//! Both directions share the same shape: for each dequeued unvisited
//! transaction, the stop predicate decides whether the branch is pruned
//! (marked visited, neighbors not expanded) or visited and expanded. All
//! effects happen through the visitor, which keeps the primitive reusable for
//! counting, collection, and rating. The visited set is owned by the caller
//! and mutated in place, so traversals can be chained or pre-seeded to
//! exclude parts of the graph.

use crate::{Error, Hash, TangleStore, Transaction};
use std::collections::{HashSet, VecDeque};

/// Walks the future cone of `start`: every transaction that directly or
/// transitively references it.
///
/// The walk is keyed off the approver index, so `start` itself is never
/// loaded or visited; entry points that are snapshot hashes rather than
/// stored transactions can be traversed from. Approvers are expanded in hash
/// order so side effects are reproducible.
///
/// Fails if any discovered approver cannot be loaded.
pub fn traverse_approvers<S, F, V>(
    store: &S,
    start: &Hash,
    mut should_stop: F,
    mut visit: V,
    visited: &mut HashSet<Hash>,
) -> Result<(), Error>
where
    S: TangleStore,
    F: FnMut(&Transaction) -> bool,
    V: FnMut(&Transaction),
{
    let mut queue: VecDeque<Hash> = sorted(store.approvers(start)?).into();
    while let Some(hash) = queue.pop_front() {
        if !visited.insert(hash) {
            continue;
        }
        let tx = store
            .transaction(&hash)?
            .ok_or(Error::MissingTransaction(hash))?;
        if should_stop(&tx) {
            continue;
        }
        visit(&tx);
        for approver in sorted(store.approvers(&hash)?) {
            if !visited.contains(&approver) {
                queue.push_back(approver);
            }
        }
    }
    Ok(())
}

/// Walks the past cone of `start`: the transaction itself and everything it
/// directly or transitively references.
///
/// Unlike [traverse_approvers], the starting transaction is examined first
/// and must be loadable. Parents are expanded trunk before branch.
///
/// Fails if any referenced transaction cannot be loaded; pre-seed `visited`
/// with boundary hashes (pruned history, solid entry points) to keep the walk
/// inside the retained graph.
pub fn traverse_approvees<S, F, V>(
    store: &S,
    start: &Hash,
    mut should_stop: F,
    mut visit: V,
    visited: &mut HashSet<Hash>,
) -> Result<(), Error>
where
    S: TangleStore,
    F: FnMut(&Transaction) -> bool,
    V: FnMut(&Transaction),
{
    let mut queue: VecDeque<Hash> = VecDeque::from([*start]);
    while let Some(hash) = queue.pop_front() {
        if !visited.insert(hash) {
            continue;
        }
        let tx = store
            .transaction(&hash)?
            .ok_or(Error::MissingTransaction(hash))?;
        if should_stop(&tx) {
            continue;
        }
        visit(&tx);
        for parent in [tx.trunk, tx.branch] {
            if !visited.contains(&parent) {
                queue.push_back(parent);
            }
        }
    }
    Ok(())
}

fn sorted(hashes: HashSet<Hash>) -> Vec<Hash> {
    let mut hashes: Vec<Hash> = hashes.into_iter().collect();
    hashes.sort();
    hashes
}
