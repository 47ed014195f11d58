pub mod block;
pub mod hasher;
pub mod model;
pub mod pow;

pub use block::{Block, Timestamp};
pub use model::{ChainValidation, Ledger, LedgerConfig};

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Difficulty bounds accepted from configuration and requests.
pub const DIFF_MIN: u32 = 1;
pub const DIFF_MAX: u32 = 8;

/// Bootstrap proof stored in every genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` marker of the genesis block on a single-ledger node.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// `previous_hash` marker of the genesis block of a per-file ledger.
pub const FILE_GENESIS_PREVIOUS_HASH: &str = "genesis";
