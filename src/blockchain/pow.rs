//! Proof-of-Work: find `proof` such that
//! `sha256("{last_proof}{proof}{last_hash}")` starts with `difficulty` zero
//! hex digits.

use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};

use super::Block;
use super::hasher::sha256_hex;

/// How many candidates are tried between two looks at the cancel flag.
const CANCEL_POLL_INTERVAL: u64 = 4096;

/// Check a candidate proof against the previous block's proof and hash.
pub fn is_valid_proof(last_proof: u64, proof: u64, last_hash: &str, difficulty: u32) -> bool {
    let guess = format!("{last_proof}{proof}{last_hash}");
    sha256_hex(guess.as_bytes())
        .chars()
        .take(difficulty as usize)
        .all(|c| c == '0')
}

/// Smallest non-negative proof valid on top of `last_block`.
#[cfg(test)]
pub fn find_proof(last_block: &Block, difficulty: u32) -> u64 {
    let never = AtomicBool::new(false);
    search(last_block, difficulty, &never).unwrap_or_default()
}

/// Same search as [`find_proof`], giving up with `None` once `cancel` is set.
pub fn find_proof_cancellable(
    last_block: &Block,
    difficulty: u32,
    cancel: &AtomicBool,
) -> Option<u64> {
    search(last_block, difficulty, cancel)
}

fn search(last_block: &Block, difficulty: u32, cancel: &AtomicBool) -> Option<u64> {
    let last_proof = last_block.proof;
    let last_hash = last_block.hash();

    let mut proof: u64 = 0;
    while !is_valid_proof(last_proof, proof, &last_hash, difficulty) {
        proof += 1;
        if proof % CANCEL_POLL_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            debug!(
                "POW - search on top of #{} cancelled after {} candidates",
                last_block.index, proof
            );
            return None;
        }
    }
    debug!(
        "POW - proof {} found on top of #{} (difficulty {})",
        proof, last_block.index, difficulty
    );
    Some(proof)
}
