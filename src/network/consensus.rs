//! Longest-valid-chain conflict resolution.

use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Mutex;

use super::fetch::{ChainFetcher, PeerChain};
use crate::blockchain::{Block, Ledger};

/// Poll every peer and adopt the longest valid chain that is strictly longer
/// than ours. Returns whether the local chain was replaced.
///
/// Peers are fetched concurrently without holding the ledger lock; the
/// selection and the replacement run under it. Unreachable or malformed
/// peers simply do not vote.
pub async fn resolve(
    ledger: &Mutex<Ledger>,
    peers: &[String],
    ledger_id: Option<&str>,
    fetcher: &dyn ChainFetcher,
) -> bool {
    let baseline = ledger.lock().expect("mutex poisoned").len();

    let responses = join_all(peers.iter().map(|peer| fetcher.fetch_chain(peer, ledger_id))).await;
    let candidates: Vec<PeerChain> = peers
        .iter()
        .zip(responses)
        .filter_map(|(peer, res)| match res {
            Ok(candidate) => {
                debug!("CONSENSUS - {peer} reports {} blocks", candidate.length);
                Some(candidate)
            }
            Err(e) => {
                warn!("CONSENSUS - skipping peer: {e}");
                None
            }
        })
        .collect();

    let mut ledger = ledger.lock().expect("mutex poisoned");
    let Some(best) = select_longest(baseline, candidates, |chain| ledger.is_valid_chain(chain))
    else {
        info!("CONSENSUS - local chain of {baseline} blocks is authoritative");
        return false;
    };

    if ledger.len() >= best.len() {
        warn!(
            "CONSENSUS - local chain grew to {} while polling; keeping it",
            ledger.len()
        );
        return false;
    }
    ledger.replace_chain(best);
    true
}

/// Scan candidates in order, keeping the first valid chain of each new
/// maximum length. Ties never displace the current best, nor the local chain.
pub fn select_longest<F>(baseline: usize, candidates: Vec<PeerChain>, is_valid: F) -> Option<Vec<Block>>
where
    F: Fn(&[Block]) -> bool,
{
    let mut max_length = baseline;
    let mut best = None;
    for candidate in candidates {
        if candidate.length > max_length && is_valid(&candidate.chain) {
            max_length = candidate.length;
            best = Some(candidate.chain);
        }
    }
    best
}
