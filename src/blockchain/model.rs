use log::{debug, info};
use std::mem;

use super::pow::is_valid_proof;
use super::{Block, DEFAULT_DIFFICULTY, FILE_GENESIS_PREVIOUS_HASH, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// How strictly candidate chains from peers are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainValidation {
    /// Only the Proof-of-Work between each adjacent pair is checked.
    #[default]
    ProofOnly,
    /// Additionally require `previous_hash` to equal the predecessor's digest.
    ProofAndLinkage,
}

/// Per-ledger settings.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub difficulty: u32,
    pub genesis_previous_hash: String,
    pub validation: ChainValidation,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            genesis_previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            validation: ChainValidation::ProofOnly,
        }
    }
}

impl LedgerConfig {
    /// Settings for a per-file ledger.
    pub fn for_files() -> Self {
        Self {
            genesis_previous_hash: FILE_GENESIS_PREVIOUS_HASH.to_string(),
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_validation(mut self, validation: ChainValidation) -> Self {
        self.validation = validation;
        self
    }
}

/// In-memory chain plus the pool of transactions waiting for the next block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    config: LedgerConfig,
}

impl Ledger {
    /// Initialize a ledger holding only its genesis block.
    pub fn new(config: LedgerConfig) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            config,
        };
        let genesis = Block::genesis(&ledger.config.genesis_previous_hash, GENESIS_PROOF);
        ledger.chain.push(genesis);
        ledger
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn new_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        debug!("POOL - {} pending transaction(s)", self.pending.len());
        self.last_block().index + 1
    }

    /// Run the Proof-of-Work against the tip and append a block with the
    /// whole pending pool, blocking the caller. Nodes mine through
    /// `LedgerNode::mine`, which searches without holding the ledger.
    #[cfg(test)]
    pub fn mine_block(&mut self) -> &Block {
        let proof = super::pow::find_proof(self.last_block(), self.config.difficulty);
        self.forge_block(proof)
    }

    /// Append a block carrying `proof` on top of the current tip, draining
    /// the pending pool into it. The caller is responsible for `proof`.
    pub fn forge_block(&mut self, proof: u64) -> &Block {
        let previous_hash = self.last_block().hash();
        let transactions = mem::take(&mut self.pending);
        let block = Block::new(self.chain.len() as u64 + 1, transactions, proof, previous_hash);
        info!(
            "LEDGER - sealed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Check a candidate chain block by block from index 2.
    ///
    /// The genesis block is never inspected, so its bootstrap proof is exempt.
    /// With [`ChainValidation::ProofOnly`] the recorded `previous_hash` values
    /// are not compared against the recomputed digests.
    pub fn is_valid_chain(&self, candidate: &[Block]) -> bool {
        for pair in candidate.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let prev_hash = prev.hash();

            if !is_valid_proof(prev.proof, curr.proof, &prev_hash, self.config.difficulty) {
                debug!("VALIDATE - bad proof at #{}", curr.index);
                return false;
            }
            if self.config.validation == ChainValidation::ProofAndLinkage
                && curr.previous_hash != prev_hash
            {
                debug!("VALIDATE - broken link at #{}", curr.index);
                return false;
            }
        }
        true
    }

    /// Swap the whole chain. The pending pool is left as is.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        if chain.is_empty() {
            return;
        }
        info!(
            "LEDGER - chain replaced: {} -> {} blocks",
            self.chain.len(),
            chain.len()
        );
        self.chain = chain;
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }
}
