//! CLI commands module.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use powchain_chain::{Ledger, LedgerConfig};
use powchain_core::Block;
use std::path::PathBuf;

mod block;
mod demo;
mod init;
mod mine;
mod search;
mod verify;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new chain file
    Init(init::InitArgs),
    /// Run the sample transfers and mine two blocks
    Demo(demo::DemoArgs),
    /// Add transactions and mine a block
    Mine(mine::MineArgs),
    /// Block explorer
    Block(block::BlockArgs),
    /// Re-check a chain file
    Verify(verify::VerifyArgs),
    /// Solve a single proof-of-work puzzle
    Search(search::SearchArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init(args) => init::run(args),
        Commands::Demo(args) => demo::run(args),
        Commands::Mine(args) => mine::run(args),
        Commands::Block(args) => block::run(args),
        Commands::Verify(args) => verify::run(args),
        Commands::Search(args) => search::run(args),
    }
}

/// Options shared by every command that works on a chain file.
#[derive(Args, Debug, Clone)]
pub struct ChainArgs {
    /// Chain file
    #[arg(short, long, default_value = "blockchain.json")]
    pub file: PathBuf,

    /// JSON ledger configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Proof-of-work difficulty in bits (overrides the config file).
    ///
    /// The chain file does not record its difficulty, so pass the value the
    /// chain was created with on every command. Defaults to 16.
    #[arg(short, long)]
    pub difficulty: Option<u32>,

    /// Search for proofs on all cores
    #[arg(long)]
    pub parallel: bool,
}

impl ChainArgs {
    /// Build the ledger configuration: file values first, then flags.
    pub fn ledger_config(&self) -> Result<LedgerConfig> {
        let mut config = match &self.config {
            Some(path) => LedgerConfig::from_file(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?,
            None => LedgerConfig::default(),
        };

        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if self.parallel {
            config.parallel = true;
        }

        Ok(config)
    }

    /// Restore the ledger from the chain file.
    pub fn restore(&self) -> Result<Ledger> {
        Ledger::restore_with_config(&self.file, self.ledger_config()?).with_context(|| {
            format!(
                "Failed to load {}. Did you run 'powchain init'?",
                self.file.display()
            )
        })
    }
}

/// Print a block the way every command shows it.
pub fn print_block(block: &Block) {
    println!(
        "  {} {}",
        format!("#{}", block.index).bright_black(),
        Ledger::hash_of(block).to_hex().bright_yellow()
    );
    println!("    Previous:     {}", block.previous_hash.to_hex().bright_black());
    println!("    Proof:        {}", block.proof.to_string().bright_cyan());
    println!("    Timestamp:    {}", block.timestamp.to_string().bright_black());
    println!(
        "    Transactions: {}",
        block.tx_count().to_string().bright_cyan()
    );
    for tx in &block.transactions {
        println!(
            "      {} -> {}: {}",
            tx.sender,
            tx.recipient,
            tx.amount.to_string().bright_green()
        );
    }
}
