//! Block storage on top of a chain file.

use crate::db::{Result, Storage};
use powchain_core::Block;

/// Reads and writes the chain as an ordered JSON array of blocks, genesis
/// first.
///
/// Note: This does NOT validate linkage. Loaded blocks must be checked
/// before they are trusted.
pub struct ChainStore<'a> {
    storage: &'a Storage,
}

impl<'a> ChainStore<'a> {
    /// Create a new ChainStore wrapping the given storage.
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Check if a chain has been written.
    pub fn is_initialized(&self) -> bool {
        self.storage.exists()
    }

    /// Load every block in chain order.
    pub fn load_blocks(&self) -> Result<Vec<Block>> {
        let blocks: Vec<Block> = self.storage.get_or_err()?;
        tracing::debug!(path = %self.storage.path().display(), blocks = blocks.len(), "loaded chain file");
        Ok(blocks)
    }

    /// Replace the stored chain with `blocks`.
    pub fn save_blocks(&self, blocks: &[Block]) -> Result<()> {
        self.storage.put(blocks)?;
        tracing::debug!(path = %self.storage.path().display(), blocks = blocks.len(), "wrote chain file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StorageError;
    use powchain_core::{hash, Hash, Transaction};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("blockchain.json"));
        (dir, storage)
    }

    fn blocks() -> Vec<Block> {
        let genesis = Block {
            index: 0,
            timestamp: 1_700_000_000.25,
            transactions: vec![],
            proof: 42,
            previous_hash: hash(b"root_hash42"),
        };
        let block1 = Block {
            index: 1,
            timestamp: 1_700_000_010.75,
            transactions: vec![
                Transaction::new("Satoshi", "Mike", 1).unwrap(),
                Transaction::new("Alice", "Bob", 0.5).unwrap(),
            ],
            proof: 7,
            previous_hash: genesis.hash(),
        };
        vec![genesis, block1]
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, storage) = setup();
        let chain = ChainStore::new(&storage);

        assert!(!chain.is_initialized());
        chain.save_blocks(&blocks()).unwrap();
        assert!(chain.is_initialized());

        let loaded = chain.load_blocks().unwrap();
        assert_eq!(loaded, blocks());
        // Hashes survive the trip through the file.
        assert_eq!(loaded[1].previous_hash, loaded[0].hash());
    }

    #[test]
    fn test_load_uninitialized_fails() {
        let (_dir, storage) = setup();
        let chain = ChainStore::new(&storage);

        assert!(matches!(
            chain.load_blocks(),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_layout() {
        let (_dir, storage) = setup();
        let chain = ChainStore::new(&storage);

        let genesis = Block {
            index: 0,
            timestamp: 1.5,
            transactions: vec![Transaction::new("a", "b", 2).unwrap()],
            proof: 3,
            previous_hash: Hash::ZERO,
        };
        chain.save_blocks(&[genesis]).unwrap();

        let text = std::fs::read_to_string(storage.path()).unwrap();
        let expected = format!(
            "[\n    {{\n        \"index\": 0,\n        \"timestamp\": 1.5,\n        \"transactions\": [\n            {{\n                \"sender\": \"a\",\n                \"recipient\": \"b\",\n                \"amount\": 2.0\n            }}\n        ],\n        \"proof\": 3,\n        \"previous_hash\": \"{}\"\n    }}\n]",
            "0".repeat(64)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_unknown_block_field_rejected() {
        let (_dir, storage) = setup();
        let chain = ChainStore::new(&storage);

        let json = format!(
            r#"[{{"index": 0, "timestamp": 1.0, "transactions": [], "proof": 1, "previous_hash": "{}", "miner": "x"}}]"#,
            "0".repeat(64)
        );
        std::fs::write(storage.path(), json).unwrap();

        assert!(matches!(
            chain.load_blocks(),
            Err(StorageError::Serialization(_))
        ));
    }
}
