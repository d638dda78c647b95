//! In-memory collaborators for tests.

use crate::{
    Address, Error, Hash, LedgerView, Round, RoundIndex, RoundOracle, SnapshotView, TangleStore,
    Transaction,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Deterministic test hash: the index in the leading bytes.
pub fn hash(index: u64) -> Hash {
    let mut bytes = [0u8; Hash::LENGTH];
    bytes[..8].copy_from_slice(&index.to_be_bytes());
    Hash::new(bytes)
}

/// Deterministic test address.
pub fn address(index: u64) -> Address {
    let mut bytes = [0u8; Address::LENGTH];
    bytes[..8].copy_from_slice(&index.to_be_bytes());
    Address::new(bytes)
}

/// A solid, unconfirmed, zero-value bundle tail.
pub fn tail(index: u64, trunk: Hash, branch: Hash) -> Transaction {
    Transaction {
        hash: hash(index),
        trunk,
        branch,
        bundle_index: 0,
        solid: true,
        confirmed: None,
        address: address(index),
        value: 0,
        arrival_ms: index,
    }
}

/// A solid bundle tail confirmed at `round`.
pub fn confirmed_tail(index: u64, trunk: Hash, branch: Hash, round: RoundIndex) -> Transaction {
    Transaction {
        confirmed: Some(round),
        ..tail(index, trunk, branch)
    }
}

#[derive(Default)]
struct StoreInner {
    transactions: HashMap<Hash, Transaction>,
    approvers: HashMap<Hash, HashSet<Hash>>,
    loads: u64,
}

/// An in-memory [TangleStore] that maintains the approver index on insert.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

impl Store {
    /// Stores a transaction and indexes it as an approver of its parents.
    pub fn insert(&self, tx: Transaction) {
        let mut inner = self.inner.lock().unwrap();
        for parent in [tx.trunk, tx.branch] {
            inner.approvers.entry(parent).or_default().insert(tx.hash);
        }
        inner.transactions.insert(tx.hash, tx);
    }

    /// Drops a transaction record, leaving any approver index entries in
    /// place (a hash that is referenced but cannot be loaded).
    pub fn remove(&self, hash: &Hash) {
        self.inner.lock().unwrap().transactions.remove(hash);
    }

    /// Applies `mutate` to a stored transaction.
    pub fn update(&self, hash: &Hash, mutate: impl FnOnce(&mut Transaction)) {
        let mut inner = self.inner.lock().unwrap();
        let tx = inner.transactions.get_mut(hash).expect("unknown transaction");
        mutate(tx);
    }

    /// Number of transaction loads served, for asserting on scan reuse.
    pub fn loads(&self) -> u64 {
        self.inner.lock().unwrap().loads
    }
}

impl TangleStore for Store {
    fn transaction(&self, hash: &Hash) -> Result<Option<Transaction>, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.loads += 1;
        Ok(inner.transactions.get(hash).cloned())
    }

    fn approvers(&self, hash: &Hash) -> Result<HashSet<Hash>, Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.approvers.get(hash).cloned().unwrap_or_default())
    }
}

struct SnapshotInner {
    earliest: RoundIndex,
    latest: RoundIndex,
    latest_hash: Hash,
    solid_entry_points: HashMap<Hash, RoundIndex>,
}

/// An adjustable [SnapshotView].
///
/// Starts at round zero with the genesis hash recorded as the only solid
/// entry point.
#[derive(Clone)]
pub struct Snapshot {
    inner: Arc<Mutex<SnapshotInner>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SnapshotInner {
                earliest: 0,
                latest: 0,
                latest_hash: Hash::EMPTY,
                solid_entry_points: HashMap::from([(Hash::EMPTY, 0)]),
            })),
        }
    }
}

impl Snapshot {
    pub fn set_earliest_retained(&self, index: RoundIndex) {
        self.inner.lock().unwrap().earliest = index;
    }

    pub fn set_latest_confirmed(&self, index: RoundIndex) {
        self.inner.lock().unwrap().latest = index;
    }

    pub fn set_latest_hash(&self, hash: Hash) {
        self.inner.lock().unwrap().latest_hash = hash;
    }

    pub fn add_solid_entry_point(&self, hash: Hash, round: RoundIndex) {
        self.inner
            .lock()
            .unwrap()
            .solid_entry_points
            .insert(hash, round);
    }
}

impl SnapshotView for Snapshot {
    fn earliest_retained(&self) -> RoundIndex {
        self.inner.lock().unwrap().earliest
    }

    fn latest_confirmed(&self) -> RoundIndex {
        self.inner.lock().unwrap().latest
    }

    fn latest_hash(&self) -> Hash {
        self.inner.lock().unwrap().latest_hash
    }

    fn solid_entry_points(&self) -> HashMap<Hash, RoundIndex> {
        self.inner.lock().unwrap().solid_entry_points.clone()
    }
}

/// An in-memory [RoundOracle].
#[derive(Clone, Default)]
pub struct Rounds {
    inner: Arc<Mutex<BTreeMap<RoundIndex, BTreeSet<Hash>>>>,
}

impl Rounds {
    /// Records `hash` as confirmed by round `index`.
    pub fn confirm(&self, index: RoundIndex, hash: Hash) {
        self.inner.lock().unwrap().entry(index).or_default().insert(hash);
    }
}

impl RoundOracle for Rounds {
    fn closest_round(&self, index: RoundIndex) -> Result<Option<Round>, Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .range(index..)
            .next()
            .map(|(index, confirmed)| Round {
                index: *index,
                confirmed: confirmed.clone(),
            }))
    }
}

/// A [LedgerView] that derives balance diffs from stored transaction values.
///
/// Folding a tip walks its unconfirmed past cone (stopping at confirmed
/// transactions, anything already approved, and unresolvable hashes, which
/// are treated as pruned boundary history), sums value deltas per address,
/// and accepts the fold only if no address drops below its baseline balance.
#[derive(Clone)]
pub struct Ledger {
    store: Store,
    balances: Arc<Mutex<HashMap<Address, i64>>>,
}

impl Ledger {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            balances: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Sets the confirmed baseline balance of an address.
    pub fn credit(&self, address: Address, amount: i64) {
        self.balances.lock().unwrap().insert(address, amount);
    }
}

impl LedgerView for Ledger {
    fn fold_diff(
        &self,
        approved: &mut HashSet<Hash>,
        diff: &mut HashMap<Address, i64>,
        tip: &Hash,
    ) -> Result<bool, Error> {
        if approved.contains(tip) {
            return Ok(true);
        }

        // gather the unconfirmed, not-yet-approved past cone of the tip
        let mut visited = approved.clone();
        let mut delta: HashMap<Address, i64> = HashMap::new();
        let mut stack = vec![*tip];
        while let Some(hash) = stack.pop() {
            if hash == Hash::EMPTY || !visited.insert(hash) {
                continue;
            }
            let Some(tx) = self.store.transaction(&hash)? else {
                continue;
            };
            if tx.confirmed.is_some() {
                continue;
            }
            if tx.value != 0 {
                *delta.entry(tx.address).or_insert(0) += tx.value;
            }
            stack.push(tx.trunk);
            stack.push(tx.branch);
        }

        // merge with what the walk already approved and check the baseline
        let mut merged = diff.clone();
        for (address, value) in delta {
            *merged.entry(address).or_insert(0) += value;
        }
        let balances = self.balances.lock().unwrap();
        for (address, value) in &merged {
            if balances.get(address).copied().unwrap_or(0) + value < 0 {
                return Ok(false);
            }
        }

        *diff = merged;
        approved.extend(visited);
        Ok(true)
    }
}
