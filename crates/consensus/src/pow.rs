//! Proof of Work (PoW) search.
//!
//! A puzzle is a header value plus a difficulty in bits. A nonce solves it
//! when `SHA-256(header ++ nonce)`, with both rendered as text and the digest
//! read as a big-endian 256-bit integer, is below `2^(256 - difficulty)`.
//! That is the same as the digest having at least `difficulty` leading zero
//! bits, which is how the check is carried out.

use powchain_core::Hash;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Write as _};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default size of the nonce space searched for a solution (4 billion).
pub const MAX_NONCE: u64 = 1 << 32;

/// Header hashed for the genesis block's puzzle.
pub const GENESIS_HEADER: &str = "root_hash";

/// Genesis header used by chains created before `GENESIS_HEADER`.
pub const LEGACY_GENESIS_HEADER: &str = "root_block";

/// Errors that can occur during a proof-of-work search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PowError {
    #[error("proof of work exhausted: no nonce below {max_nonce} solves {header:?} at difficulty {difficulty_bits}")]
    ProofOfWorkExhausted {
        header: String,
        difficulty_bits: u32,
        max_nonce: u64,
    },

    #[error("difficulty must be between 1 and 255 bits, got {0}")]
    InvalidDifficulty(u32),
}

pub type Result<T> = std::result::Result<T, PowError>;

/// Proof of Work configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowConfig {
    /// Exclusive upper bound of the nonce space.
    pub max_nonce: u64,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            max_nonce: MAX_NONCE,
        }
    }
}

impl PowConfig {
    /// Create a configuration with the given nonce bound.
    pub fn new(max_nonce: u64) -> Self {
        Self { max_nonce }
    }
}

/// A solved puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    /// The winning nonce.
    pub nonce: u64,
    /// Digest of the header concatenated with the nonce.
    pub digest: Hash,
}

impl Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nonce {} -> {}", self.nonce, self.digest)
    }
}

/// The proof-of-work engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProofOfWork {
    config: PowConfig,
}

impl ProofOfWork {
    /// Create an engine with the given configuration.
    pub fn new(config: PowConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PowConfig {
        &self.config
    }

    /// Find the lowest nonce that solves the puzzle for `header`.
    pub fn search<H: Display + ?Sized>(&self, header: &H, difficulty_bits: u32) -> Result<Solution> {
        check_difficulty(difficulty_bits)?;
        let puzzle = Puzzle::new(header);

        let mut buf = String::with_capacity(20);
        for nonce in 0..self.config.max_nonce {
            let digest = puzzle.digest_with(nonce, &mut buf);
            if meets_target(&digest, difficulty_bits) {
                return Ok(Solution { nonce, digest });
            }
        }

        Err(self.exhausted(puzzle.header, difficulty_bits))
    }

    /// Same as [`search`](Self::search), spread over the rayon thread pool.
    ///
    /// The lowest satisfying nonce wins, so the result is identical to the
    /// sequential search. Workers stop once no lower nonce can still win.
    pub fn search_parallel<H: Display + ?Sized>(
        &self,
        header: &H,
        difficulty_bits: u32,
    ) -> Result<Solution> {
        check_difficulty(difficulty_bits)?;
        let puzzle = Puzzle::new(header);

        let found = (0..self.config.max_nonce)
            .into_par_iter()
            .find_map_first(|nonce| {
                let digest = puzzle.digest_with(nonce, &mut String::with_capacity(20));
                meets_target(&digest, difficulty_bits).then_some(Solution { nonce, digest })
            });

        found.ok_or_else(|| self.exhausted(puzzle.header, difficulty_bits))
    }

    fn exhausted(&self, header: String, difficulty_bits: u32) -> PowError {
        PowError::ProofOfWorkExhausted {
            header,
            difficulty_bits,
            max_nonce: self.config.max_nonce,
        }
    }
}

/// Header text with its hashing state precomputed.
struct Puzzle {
    header: String,
    prefix: Sha256,
}

impl Puzzle {
    fn new<H: Display + ?Sized>(header: &H) -> Self {
        let header = header.to_string();
        let mut prefix = Sha256::new();
        prefix.update(header.as_bytes());
        Self { header, prefix }
    }

    fn digest_with(&self, nonce: u64, buf: &mut String) -> Hash {
        buf.clear();
        // Writing into a String cannot fail.
        let _ = write!(buf, "{nonce}");
        let mut hasher = self.prefix.clone();
        hasher.update(buf.as_bytes());
        Hash(hasher.finalize().into())
    }
}

fn check_difficulty(difficulty_bits: u32) -> Result<()> {
    if (1..256).contains(&difficulty_bits) {
        Ok(())
    } else {
        Err(PowError::InvalidDifficulty(difficulty_bits))
    }
}

/// Check whether a digest is below the target `2^(256 - difficulty_bits)`.
pub fn meets_target(digest: &Hash, difficulty_bits: u32) -> bool {
    digest.leading_zero_bits() >= difficulty_bits
}

/// Digest of a single candidate: `SHA-256(header ++ nonce)`.
pub fn candidate_digest<H: Display + ?Sized>(header: &H, nonce: u64) -> Hash {
    Puzzle::new(header).digest_with(nonce, &mut String::new())
}

/// Check a claimed nonce against a puzzle.
pub fn verify<H: Display + ?Sized>(header: &H, nonce: u64, difficulty_bits: u32) -> bool {
    check_difficulty(difficulty_bits).is_ok()
        && meets_target(&candidate_digest(header, nonce), difficulty_bits)
}

/// Search with the default configuration.
pub fn search<H: Display + ?Sized>(header: &H, difficulty_bits: u32) -> Result<Solution> {
    ProofOfWork::default().search(header, difficulty_bits)
}

/// Run `f` and log how long it took.
///
/// Only measures; the value returned by `f` is passed through untouched.
pub fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    timed_with_elapsed(label, f).0
}

/// Like [`timed`], but also hands the elapsed time back to the caller.
pub fn timed_with_elapsed<T>(label: &str, f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    tracing::debug!(target: "powchain::timing", label, ?elapsed, "timed call finished");
    (out, elapsed)
}
