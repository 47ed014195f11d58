use log::info;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

use crate::blockchain::{Block, DIFF_MAX, DIFF_MIN, LedgerConfig};
use crate::error::LedgerError;
use crate::node::LedgerNode;

/// Independent ledgers keyed by file id.
///
/// The map lock is held only to look up or insert entries; each ledger has
/// its own locks, so work on one file never waits on another.
#[derive(Debug)]
pub struct LedgerRegistry {
    ledgers: RwLock<HashMap<String, Arc<LedgerNode>>>,
    defaults: LedgerConfig,
}

impl LedgerRegistry {
    pub fn new(defaults: LedgerConfig) -> Self {
        Self {
            ledgers: RwLock::new(HashMap::new()),
            defaults,
        }
    }

    /// Create the ledger for `id`, optionally with its own difficulty.
    pub fn create(&self, id: &str, difficulty: Option<u32>) -> Result<Arc<LedgerNode>, LedgerError> {
        let difficulty = difficulty.unwrap_or(self.defaults.difficulty);
        if !(DIFF_MIN..=DIFF_MAX).contains(&difficulty) {
            return Err(LedgerError::InvalidDifficulty(difficulty));
        }

        let mut ledgers = self.ledgers.write().expect("rwlock poisoned");
        match ledgers.entry(id.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateId(id.to_string())),
            Entry::Vacant(slot) => {
                let config = self.defaults.clone().with_difficulty(difficulty);
                let node = Arc::new(LedgerNode::with_id(id, config));
                slot.insert(Arc::clone(&node));
                info!("REGISTRY - new ledger {id:?} (difficulty {difficulty})");
                Ok(node)
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Arc<LedgerNode>, LedgerError> {
        self.ledgers
            .read()
            .expect("rwlock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// Every ledger's chain, sorted by id.
    pub fn snapshot(&self) -> Vec<(String, Vec<Block>)> {
        let nodes: Vec<(String, Arc<LedgerNode>)> = {
            let ledgers = self.ledgers.read().expect("rwlock poisoned");
            ledgers
                .iter()
                .map(|(id, node)| (id.clone(), Arc::clone(node)))
                .collect()
        };
        let mut out: Vec<_> = nodes
            .into_iter()
            .map(|(id, node)| (id, node.chain()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

}
