//! Main ledger orchestration.
//!
//! This module brings together the chain of blocks, the mempool, the
//! proof-of-work engine and the chain file.

use crate::mempool::{Mempool, MempoolStats};
use powchain_consensus::{
    timed, ChainValidator, PowConfig, PowError, ProofOfWork, Solution, ValidationError,
    GENESIS_HEADER,
};
use powchain_core::{Block, Hash, IntoAmount, Transaction, TransactionError};
use powchain_storage::{ChainStore, Storage, StorageError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("proof of work error: {0}")]
    Pow(#[from] PowError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("chain has no blocks")]
    EmptyChain,
}

impl LedgerError {
    /// Index of the block that broke the chain, for integrity failures.
    pub fn integrity_index(&self) -> Option<u64> {
        match self {
            Self::Validation(ValidationError::ChainIntegrity { index, .. }) => Some(*index),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Proof-of-work difficulty in leading zero bits.
    pub difficulty: u32,
    /// Header solved for the genesis block.
    pub genesis_header: String,
    /// Proof-of-work engine settings.
    pub pow: PowConfig,
    /// Spread proof-of-work searches over all cores.
    pub parallel: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: 16,
            genesis_header: GENESIS_HEADER.to_string(),
            pow: PowConfig::default(),
            parallel: false,
        }
    }
}

impl LedgerConfig {
    /// Default configuration at the given difficulty.
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::open(path);
        Ok(storage.get_or_err()?)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An append-only chain of blocks plus the transactions waiting for the next
/// one.
///
/// The chain is never empty: a fresh ledger mines its genesis block on
/// construction, and a restored one rejects an empty file.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Committed blocks, genesis first.
    chain: Vec<Block>,
    /// Transactions for the next block.
    mempool: Mempool,
    /// Proof-of-work engine.
    engine: ProofOfWork,
    /// Configuration.
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger at the given difficulty and mine its genesis block.
    pub fn new(difficulty: u32) -> Result<Self> {
        Self::with_config(LedgerConfig::with_difficulty(difficulty))
    }

    /// Create a ledger from a configuration and mine its genesis block.
    ///
    /// The genesis `previous_hash` is the digest that solved the genesis
    /// header, since there is no earlier block to point at.
    pub fn with_config(config: LedgerConfig) -> Result<Self> {
        let mut ledger = Self::empty(config);

        let solution = ledger.solve(ledger.config.genesis_header.as_str())?;
        ledger.seal_block(solution.nonce, Some(solution.digest))?;

        tracing::info!(
            difficulty = ledger.config.difficulty,
            nonce = solution.nonce,
            digest = %solution.digest,
            "created genesis block"
        );
        Ok(ledger)
    }

    /// Restore a ledger from a chain file with the default configuration.
    pub fn restore<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::restore_with_config(path, LedgerConfig::default())
    }

    /// Restore a ledger from a chain file.
    ///
    /// Linkage is checked block by block; stored proofs are trusted and
    /// nothing is mined. On failure no ledger is returned.
    pub fn restore_with_config<P: AsRef<Path>>(path: P, config: LedgerConfig) -> Result<Self> {
        let storage = Storage::open(path.as_ref());
        let blocks = ChainStore::new(&storage).load_blocks()?;
        let ledger = Self::from_blocks(blocks, config)?;

        tracing::info!(
            path = %path.as_ref().display(),
            blocks = ledger.block_count(),
            "restored chain"
        );
        Ok(ledger)
    }

    /// Check whether a chain file has been written at `path`.
    pub fn is_initialized<P: AsRef<Path>>(path: P) -> bool {
        let storage = Storage::open(path.as_ref());
        ChainStore::new(&storage).is_initialized()
    }

    /// Build a ledger from already loaded blocks after validating them.
    pub fn from_blocks(blocks: Vec<Block>, config: LedgerConfig) -> Result<Self> {
        if let Err(e) = Self::validate(&blocks) {
            tracing::warn!(error = %e, "rejected chain");
            return Err(e);
        }

        let mut ledger = Self::empty(config);
        ledger.chain = blocks;
        Ok(ledger)
    }

    /// Write the chain to a file, replacing its previous content.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let storage = Storage::open(path.as_ref());
        ChainStore::new(&storage).save_blocks(&self.chain)?;

        tracing::info!(
            path = %path.as_ref().display(),
            blocks = self.block_count(),
            "persisted chain"
        );
        Ok(())
    }

    fn empty(config: LedgerConfig) -> Self {
        Self {
            chain: Vec::new(),
            mempool: Mempool::new(),
            engine: ProofOfWork::new(config.pow),
            config,
        }
    }

    /// Queue a transaction for the next block.
    ///
    /// The amount is coerced to a float; sender and recipient are not
    /// checked in any way.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl IntoAmount,
    ) -> Result<()> {
        let tx = Transaction::new(sender, recipient, amount)?;
        self.submit_transaction(tx);
        Ok(())
    }

    /// Queue an already built transaction.
    pub fn submit_transaction(&mut self, tx: Transaction) {
        self.mempool.add(tx);
    }

    /// Canonical hash of a block.
    pub fn hash_of(block: &Block) -> Hash {
        block.hash()
    }

    /// Get the latest block.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Seal the pending transactions into a new block.
    ///
    /// `previous_hash` defaults to the hash of the latest block. The proof is
    /// taken as given; finding it is up to the caller (see [`solve_next`]).
    ///
    /// [`solve_next`]: Self::solve_next
    pub fn seal_block(&mut self, proof: u64, previous_hash: Option<Hash>) -> Result<&Block> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => Self::hash_of(self.last_block()?),
        };

        let index = self.chain.len() as u64;
        let block = Block::new(index, self.mempool.take_all(), proof, previous_hash);

        tracing::debug!(
            index,
            transactions = block.tx_count(),
            proof,
            previous_hash = %previous_hash,
            "sealed block"
        );

        self.chain.push(block);
        self.last_block()
    }

    /// Solve the puzzle for the next block: the hash of the latest block at
    /// the ledger's difficulty.
    pub fn solve_next(&self) -> Result<Solution> {
        let header = Self::hash_of(self.last_block()?);
        self.solve(&header)
    }

    /// Solve the next puzzle and seal the pending transactions with it.
    pub fn mine_block(&mut self) -> Result<&Block> {
        let solution = self.solve_next()?;
        self.seal_block(solution.nonce, None)
    }

    fn solve<H: std::fmt::Display + ?Sized>(&self, header: &H) -> Result<Solution> {
        let difficulty = self.config.difficulty;
        let solution = timed("proof_of_work", || {
            if self.config.parallel {
                self.engine.search_parallel(header, difficulty)
            } else {
                self.engine.search(header, difficulty)
            }
        })?;
        Ok(solution)
    }

    /// Check hash linkage over `chain`, failing at the first block whose
    /// `previous_hash` does not match its predecessor.
    pub fn validate(chain: &[Block]) -> Result<()> {
        ChainValidator::validate_linkage(chain)?;
        Ok(())
    }

    /// Re-check every stored proof of work against this ledger's
    /// configuration.
    pub fn verify_proofs(&self) -> Result<()> {
        ChainValidator::validate_proofs(
            &self.chain,
            &self.config.genesis_header,
            self.config.difficulty,
        )?;
        Ok(())
    }

    /// Number of committed blocks.
    pub fn block_count(&self) -> usize {
        self.chain.len()
    }

    /// Number of transactions waiting for the next block.
    pub fn pending_count(&self) -> usize {
        self.mempool.len()
    }

    /// Proof-of-work difficulty in bits.
    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    /// Committed blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Transactions waiting for the next block.
    pub fn pending_transactions(&self) -> &[Transaction] {
        self.mempool.get_all()
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get ledger statistics.
    pub fn stats(&self) -> Result<LedgerStats> {
        let latest = self.last_block()?;
        Ok(LedgerStats {
            block_count: self.block_count(),
            latest_block_hash: Self::hash_of(latest),
            latest_timestamp: latest.timestamp,
            total_transactions: self.chain.iter().map(Block::tx_count).sum(),
            mempool: self.mempool.stats(),
            difficulty: self.config.difficulty,
        })
    }
}

/// Ledger statistics.
#[derive(Debug, Clone)]
pub struct LedgerStats {
    /// Number of committed blocks.
    pub block_count: usize,
    /// Hash of the latest block.
    pub latest_block_hash: Hash,
    /// Timestamp of the latest block.
    pub latest_timestamp: f64,
    /// Transactions committed across all blocks.
    pub total_transactions: usize,
    /// Pending transaction statistics.
    pub mempool: MempoolStats,
    /// Proof-of-work difficulty in bits.
    pub difficulty: u32,
}
