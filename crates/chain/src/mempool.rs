//! Pending transaction pool.
//!
//! The mempool holds transactions waiting to be sealed into the next block,
//! in insertion order. It performs no validation: duplicates are kept and
//! amounts are never checked against balances.

use powchain_core::Transaction;
use std::collections::HashSet;

/// Transaction mempool.
#[derive(Debug, Clone, Default)]
pub struct Mempool {
    /// Pending transactions in insertion order.
    transactions: Vec<Transaction>,
}

impl Mempool {
    /// Create an empty mempool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of transactions in the mempool.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the mempool is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Add a transaction to the mempool.
    pub fn add(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Take every pending transaction, leaving the mempool empty.
    ///
    /// The returned vector is owned by the caller; nothing added afterwards
    /// can show up in it.
    pub fn take_all(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }

    /// Get all pending transactions in insertion order.
    pub fn get_all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Get mempool statistics.
    pub fn stats(&self) -> MempoolStats {
        let senders: HashSet<&str> = self.transactions.iter().map(|tx| tx.sender.as_str()).collect();
        MempoolStats {
            total_transactions: self.len(),
            unique_senders: senders.len(),
            total_amount: self.transactions.iter().map(|tx| tx.amount).sum(),
        }
    }
}

/// Mempool statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MempoolStats {
    /// Total number of transactions.
    pub total_transactions: usize,
    /// Number of unique senders.
    pub unique_senders: usize,
    /// Sum of all pending amounts.
    pub total_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(sender: &str, recipient: &str, amount: f64) -> Transaction {
        Transaction::new(sender, recipient, amount).unwrap()
    }

    #[test]
    fn test_mempool_add_keeps_order() {
        let mut mempool = Mempool::new();
        mempool.add(tx("Satoshi", "Mike", 1.0));
        mempool.add(tx("Mike", "Satoshi", 1.0));
        mempool.add(tx("Satoshi", "Hal Finney", 5.0));

        assert_eq!(mempool.len(), 3);
        let recipients: Vec<_> = mempool.get_all().iter().map(|t| t.recipient.as_str()).collect();
        assert_eq!(recipients, ["Mike", "Satoshi", "Hal Finney"]);
    }

    #[test]
    fn test_mempool_duplicates_kept() {
        let mut mempool = Mempool::new();
        mempool.add(tx("a", "b", 1.0));
        mempool.add(tx("a", "b", 1.0));
        assert_eq!(mempool.len(), 2);
    }

    #[test]
    fn test_mempool_take_all_snapshots() {
        let mut mempool = Mempool::new();
        mempool.add(tx("a", "b", 1.0));

        let taken = mempool.take_all();
        assert!(mempool.is_empty());

        mempool.add(tx("c", "d", 2.0));
        assert_eq!(taken, vec![tx("a", "b", 1.0)]);
        assert_eq!(mempool.len(), 1);
    }

    #[test]
    fn test_mempool_stats() {
        let mut mempool = Mempool::new();
        mempool.add(tx("Alice", "Bob", 0.5));
        mempool.add(tx("Bob", "Mike", 0.25));
        mempool.add(tx("Alice", "Mike", 1.0));

        let stats = mempool.stats();
        assert_eq!(stats.total_transactions, 3);
        assert_eq!(stats.unique_senders, 2);
        assert_eq!(stats.total_amount, 1.75);
    }
}
