//! Core ledger primitives for powchain.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - SHA-256 hashing and the `Hash` digest type
//! - Canonical JSON encoding shared by hashing and persistence
//! - Transactions
//! - Blocks

pub mod block;
pub mod canonical;
pub mod hash;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use block::Block;
pub use canonical::{to_canonical_string, to_canonical_vec, EncodingError};
pub use hash::{hash, Hash, HashParseError, H256};
pub use transaction::{IntoAmount, Transaction, TransactionError};
