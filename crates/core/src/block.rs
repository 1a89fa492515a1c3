//! Block structure and canonical block hashing.

use crate::canonical::to_canonical_vec;
use crate::hash::{hash, Hash};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A committed block.
///
/// Field order here is the order used in the persisted chain file; the hash
/// is computed over the key-sorted canonical encoding instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    /// Zero-based position in the chain.
    pub index: u64,
    /// Seconds since the Unix epoch, with sub-second precision.
    pub timestamp: f64,
    /// Transactions sealed into this block.
    pub transactions: Vec<Transaction>,
    /// Proof-of-work nonce.
    pub proof: u64,
    /// Hash of the previous block, or the genesis puzzle digest.
    pub previous_hash: Hash,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(index: u64, transactions: Vec<Transaction>, proof: u64, previous_hash: Hash) -> Self {
        Self {
            index,
            timestamp: Self::current_timestamp(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Calculate the canonical hash of this block.
    pub fn hash(&self) -> Hash {
        let encoded = to_canonical_vec(self).expect("block serialization should not fail");
        hash(&encoded)
    }

    /// Get the current Unix timestamp in fractional seconds.
    pub fn current_timestamp() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_secs_f64()
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Get the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}
