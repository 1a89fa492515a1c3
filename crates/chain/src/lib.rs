//! Ledger orchestration for powchain.
//!
//! This crate brings together all components into a working ledger:
//! - **Chain**: append-only blocks linked by canonical SHA-256 hashes
//! - **Mempool**: transactions waiting for the next block
//! - **Consensus**: proof-of-work puzzles gating every block
//! - **Storage**: JSON chain file with validated restore
//!
//! # Example
//!
//! ```rust,no_run
//! use powchain_chain::Ledger;
//!
//! // Create a ledger; the genesis block is mined immediately
//! let mut ledger = Ledger::new(16).unwrap();
//!
//! // Queue transactions
//! ledger.add_transaction("Satoshi", "Mike", 1).unwrap();
//! ledger.add_transaction("Mike", "Satoshi", 1).unwrap();
//!
//! // Solve the puzzle over the latest block's hash and seal the block
//! let solution = ledger.solve_next().unwrap();
//! ledger.seal_block(solution.nonce, None).unwrap();
//!
//! // Persist and restore
//! ledger.persist("blockchain.json").unwrap();
//! let restored = Ledger::restore("blockchain.json").unwrap();
//! assert_eq!(restored.block_count(), 2);
//! ```

pub mod ledger;
pub mod mempool;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerConfig, LedgerError, LedgerStats};
pub use mempool::{Mempool, MempoolStats};
