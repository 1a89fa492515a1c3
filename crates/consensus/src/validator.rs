//! Chain validation rules.
//!
//! Linkage is the only check applied when a chain is loaded: every block must
//! sit at its own index and carry the hash of its predecessor. Proofs can be
//! re-checked separately with [`ChainValidator::validate_proofs`].

use crate::pow::{candidate_digest, verify};
use powchain_core::{Block, Hash};
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("chain integrity violated at block {index}: expected previous hash {expected}, found {found}")]
    ChainIntegrity {
        index: u64,
        expected: Hash,
        found: Hash,
    },

    #[error("block index mismatch (expected {expected}, got {got})")]
    IndexMismatch { expected: u64, got: u64 },

    #[error("block {index} carries an invalid proof of work")]
    InvalidProof { index: u64 },

    #[error("chain has no blocks")]
    EmptyChain,
}

impl ValidationError {
    /// Index of the first offending block, if the error points at one.
    pub fn index(&self) -> Option<u64> {
        match self {
            Self::ChainIntegrity { index, .. } | Self::InvalidProof { index } => Some(*index),
            Self::IndexMismatch { expected, .. } => Some(*expected),
            Self::EmptyChain => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Chain validator.
pub struct ChainValidator;

impl ChainValidator {
    /// Validate block extends the parent correctly.
    pub fn validate_block_extends_parent(block: &Block, parent: &Block) -> Result<()> {
        // Check index
        if block.index != parent.index + 1 {
            return Err(ValidationError::IndexMismatch {
                expected: parent.index + 1,
                got: block.index,
            });
        }

        // Check previous_hash
        let expected = parent.hash();
        if block.previous_hash != expected {
            return Err(ValidationError::ChainIntegrity {
                index: block.index,
                expected,
                found: block.previous_hash,
            });
        }

        Ok(())
    }

    /// Validate hash linkage over a whole chain, stopping at the first
    /// inconsistency.
    pub fn validate_linkage(chain: &[Block]) -> Result<()> {
        let genesis = chain.first().ok_or(ValidationError::EmptyChain)?;
        if genesis.index != 0 {
            return Err(ValidationError::IndexMismatch {
                expected: 0,
                got: genesis.index,
            });
        }

        for pair in chain.windows(2) {
            Self::validate_block_extends_parent(&pair[1], &pair[0])?;
        }

        Ok(())
    }

    /// Re-check every proof of work in the chain.
    ///
    /// The genesis proof must solve `genesis_header` and reproduce the
    /// genesis `previous_hash`; every later proof must solve the hash of its
    /// predecessor.
    pub fn validate_proofs(chain: &[Block], genesis_header: &str, difficulty_bits: u32) -> Result<()> {
        let genesis = chain.first().ok_or(ValidationError::EmptyChain)?;
        if !verify(genesis_header, genesis.proof, difficulty_bits)
            || candidate_digest(genesis_header, genesis.proof) != genesis.previous_hash
        {
            return Err(ValidationError::InvalidProof { index: genesis.index });
        }

        for pair in chain.windows(2) {
            let header = pair[0].hash();
            if !verify(&header, pair[1].proof, difficulty_bits) {
                return Err(ValidationError::InvalidProof { index: pair[1].index });
            }
        }

        Ok(())
    }

    /// Full validation (linkage + proofs).
    pub fn validate_full(chain: &[Block], genesis_header: &str, difficulty_bits: u32) -> Result<()> {
        Self::validate_linkage(chain)?;
        Self::validate_proofs(chain, genesis_header, difficulty_bits)?;
        Ok(())
    }
}
