use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::hasher::hash_block;
use crate::transaction::Transaction;

/// A single block in a ledger holding a batch of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    pub timestamp: Timestamp,
    pub transactions: Vec<Transaction>,
    /// Proof-of-Work answer relative to the previous block.
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block. Its proof is a bootstrap constant and is
    /// never checked against the Proof-of-Work predicate.
    pub fn genesis(previous_hash: &str, proof: u64) -> Self {
        Self::new(1, Vec::new(), proof, previous_hash.to_string())
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: Timestamp::now(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 of the block's canonical serialization.
    pub fn hash(&self) -> String {
        hash_block(self)
    }
}

/// Epoch seconds exactly as written on the wire.
///
/// Peers may send an integer (`1650017913`) or a float (`1650017913.0`);
/// the two hash differently, so the original number is kept and re-emitted
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Number);

impl Timestamp {
    /// Current time as fractional epoch seconds.
    pub fn now() -> Self {
        Self::from(Utc::now().timestamp_micros() as f64 / 1_000_000.0)
    }
}

impl From<f64> for Timestamp {
    /// Non-finite values have no JSON form and collapse to `0`.
    fn from(secs: f64) -> Self {
        Self(Number::from_f64(secs).unwrap_or_else(|| Number::from(0u64)))
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(Number::from(secs))
    }
}
