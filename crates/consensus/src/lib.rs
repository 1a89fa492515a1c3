//! Proof of Work consensus for powchain.
//!
//! This crate provides:
//! - The proof-of-work search engine (sequential and rayon-parallel)
//! - Chain validation (index order, hash linkage, proof re-checks)
//!
//! # Example
//!
//! ```rust
//! use powchain_consensus::{ChainValidator, ProofOfWork, PowConfig, GENESIS_HEADER};
//! use powchain_core::Block;
//!
//! // Solve the genesis puzzle
//! let engine = ProofOfWork::new(PowConfig::default());
//! let solution = engine.search(GENESIS_HEADER, 8).unwrap();
//!
//! // Build the genesis block from it
//! let genesis = Block::new(0, vec![], solution.nonce, solution.digest);
//! ChainValidator::validate_full(&[genesis], GENESIS_HEADER, 8).unwrap();
//! ```

pub mod pow;
pub mod validator;

// Re-export commonly used types
pub use pow::{
    candidate_digest, meets_target, search, timed, timed_with_elapsed, verify, PowConfig, PowError,
    ProofOfWork, Solution, GENESIS_HEADER, LEGACY_GENESIS_HEADER, MAX_NONCE,
};
pub use validator::{ChainValidator, ValidationError};
