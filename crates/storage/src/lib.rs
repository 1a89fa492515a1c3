//! Persistent storage layer for powchain.
//!
//! The chain lives in a single JSON document: an array of block objects in
//! chain order, indented with four spaces.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Application Layer                     │
//! │                  (Ledger, CLI commands)                  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                   Storage Layer                          │
//! │  ┌──────────────────────┐  ┌──────────────────────────┐ │
//! │  │ ChainStore           │  │ Storage (file)           │ │
//! │  │  - load/save blocks  │  │  - scoped read/write     │ │
//! │  │  - initialized check │  │  - atomic replace        │ │
//! │  └──────────────────────┘  └──────────────────────────┘ │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                   blockchain.json                        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use powchain_storage::{ChainStore, Storage};
//!
//! let storage = Storage::open("./blockchain.json");
//! let chain = ChainStore::new(&storage);
//! let blocks = chain.load_blocks().unwrap();
//! chain.save_blocks(&blocks).unwrap();
//! ```

pub mod chain;
pub mod db;

// Re-export commonly used types
pub use chain::ChainStore;
pub use db::{Result, Storage, StorageError};
