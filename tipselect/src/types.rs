//! Core types shared across the tip selection engine.

use std::fmt;

/// Index of a confirmed round.
pub type RoundIndex = u64;

/// A 32-byte transaction content id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; Self::LENGTH]);

impl Hash {
    /// Number of bytes in a [Hash].
    pub const LENGTH: usize = 32;

    /// The all-zero hash, used by genesis references.
    pub const EMPTY: Self = Self([0; Self::LENGTH]);

    /// Creates a new [Hash] from raw bytes.
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; Hash::LENGTH]> for Hash {
    fn from(bytes: [u8; Hash::LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A 32-byte account id, the key of the ledger diff.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; Self::LENGTH]);

impl Address {
    /// Number of bytes in an [Address].
    pub const LENGTH: usize = 32;

    /// Creates a new [Address] from raw bytes.
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; Address::LENGTH]> for Address {
    fn from(bytes: [u8; Address::LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// An immutable point-in-time view of a stored transaction.
///
/// Owned exclusively by storage; the engine only ever reads these views and
/// never mutates one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Content id of the transaction.
    pub hash: Hash,

    /// First referenced parent.
    pub trunk: Hash,

    /// Second referenced parent.
    pub branch: Hash,

    /// Position within the transaction's bundle. The tail (index 0) anchors
    /// ledger-diff application for the whole bundle.
    pub bundle_index: u32,

    /// Whether the transaction's full ancestry is resolvable locally, down to
    /// a snapshot boundary.
    pub solid: bool,

    /// The round that confirmed this transaction, if any.
    pub confirmed: Option<RoundIndex>,

    /// Account the transaction's value delta applies to.
    pub address: Address,

    /// Signed value delta.
    pub value: i64,

    /// Local arrival time, in milliseconds since the epoch.
    pub arrival_ms: u64,
}

impl Transaction {
    /// Whether the transaction is the tail of its bundle.
    pub fn is_tail(&self) -> bool {
        self.bundle_index == 0
    }
}

/// A confirmed round and the set of hashes it confirmed.
///
/// A round may confirm more than one hash; entry point selection breaks such
/// ties at random.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    /// Index of the round.
    pub index: RoundIndex,

    /// Hashes confirmed by the round.
    pub confirmed: std::collections::BTreeSet<Hash>,
}
