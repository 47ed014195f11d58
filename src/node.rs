//! One ledger together with its peers, plus the async operations that
//! coordinate them.

use actix_web::web;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::blockchain::pow::find_proof_cancellable;
use crate::blockchain::{Block, Ledger, LedgerConfig};
use crate::error::LedgerError;
use crate::network::{self, ChainFetcher, PeerRegistry};
use crate::transaction::Transaction;

/// Raises the shared flag when dropped, stopping a proof search whose
/// caller went away.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// A ledger, its peer set and (for per-file ledgers) its identifier.
#[derive(Debug)]
pub struct LedgerNode {
    id: Option<String>,
    ledger: Mutex<Ledger>,
    peers: Mutex<PeerRegistry>,
}

impl LedgerNode {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            id: None,
            ledger: Mutex::new(Ledger::new(config)),
            peers: Mutex::new(PeerRegistry::new()),
        }
    }

    pub fn with_id(id: impl Into<String>, config: LedgerConfig) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new(config)
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("mutex poisoned")
    }

    fn peer_registry(&self) -> MutexGuard<'_, PeerRegistry> {
        self.peers.lock().expect("mutex poisoned")
    }

    pub fn add_transaction(&self, tx: Transaction) -> u64 {
        self.ledger().new_transaction(tx)
    }

    pub fn chain(&self) -> Vec<Block> {
        self.ledger().chain().to_vec()
    }

    pub fn register_peers<I, S>(&self, addresses: I) -> Result<Vec<String>, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut peers = self.peer_registry();
        peers.register_all(addresses)?;
        debug!("PEERS - {} known for {:?}", peers.len(), self.id());
        Ok(peers.list())
    }

    pub fn peers(&self) -> Vec<String> {
        self.peer_registry().list()
    }

    /// Mine the next block without holding the ledger lock during the search.
    ///
    /// If the tip changes while searching (another block was mined or the
    /// chain was replaced) the search restarts on the new tip. `reward` is
    /// queued right before sealing, so it always lands in the mined block.
    pub async fn mine(&self, mut reward: Option<Transaction>) -> Result<Block, LedgerError> {
        loop {
            let (tip, difficulty) = {
                let ledger = self.ledger();
                (ledger.last_block().clone(), ledger.difficulty())
            };
            let tip_hash = tip.hash();

            let guard = CancelOnDrop(Arc::new(AtomicBool::new(false)));
            let flag = Arc::clone(&guard.0);
            let proof = web::block(move || find_proof_cancellable(&tip, difficulty, &flag))
                .await
                .map_err(|e| LedgerError::Internal(e.to_string()))?
                .ok_or(LedgerError::MiningCancelled)?;
            drop(guard);

            let mut ledger = self.ledger();
            if ledger.last_block().hash() != tip_hash {
                warn!(
                    "MINER - tip moved to #{} during search; retrying",
                    ledger.last_block().index
                );
                continue;
            }
            if let Some(tx) = reward.take() {
                ledger.new_transaction(tx);
            }
            debug!("MINER - sealing {} pending transaction(s)", ledger.pending().len());
            let block = ledger.forge_block(proof).clone();
            debug!("MINER - {} block(s) in ledger", ledger.len());
            return Ok(block);
        }
    }

    /// Run conflict resolution against the registered peers.
    pub async fn resolve(&self, fetcher: &dyn ChainFetcher) -> bool {
        let peers = {
            let registry = self.peer_registry();
            if registry.is_empty() {
                debug!("CONSENSUS - no peers registered for {:?}", self.id());
                return false;
            }
            registry.list()
        };
        network::resolve(&self.ledger, &peers, self.id(), fetcher).await
    }
}
