//! Block operations command.

use super::{print_block, ChainArgs};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use powchain_chain::Ledger;
use powchain_core::Hash;

#[derive(Args)]
pub struct BlockArgs {
    #[command(subcommand)]
    command: BlockCommand,
}

#[derive(Subcommand)]
enum BlockCommand {
    /// List recent blocks
    List {
        #[command(flatten)]
        chain: ChainArgs,

        /// Number of blocks to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// Show detailed block information
    Info {
        #[command(flatten)]
        chain: ChainArgs,

        /// Block index or hash (hex format)
        block_id: String,
    },
}

pub fn run(args: BlockArgs) -> Result<()> {
    match args.command {
        BlockCommand::List { chain, count } => list_blocks(chain, count),
        BlockCommand::Info { chain, block_id } => show_block_info(chain, block_id),
    }
}

fn list_blocks(chain: ChainArgs, count: usize) -> Result<()> {
    let ledger = chain.restore()?;

    println!();
    println!("{}", "Recent Blocks:".bold().cyan());
    println!();

    for block in ledger.blocks().iter().rev().take(count) {
        println!(
            "  {} {} {}",
            format!("#{}", block.index).bright_black(),
            Ledger::hash_of(block).to_hex()[..16].bright_yellow(),
            format!("({} txs)", block.tx_count()).bright_black()
        );
    }

    println!();
    Ok(())
}

fn show_block_info(chain: ChainArgs, block_id: String) -> Result<()> {
    let ledger = chain.restore()?;

    // Try parsing as index first, then as hash
    let block = if let Ok(index) = block_id.parse::<usize>() {
        ledger.blocks().get(index).context("Block not found")?
    } else {
        let hash: Hash = block_id
            .parse()
            .with_context(|| format!("Invalid block hash: {}", block_id))?;
        ledger
            .blocks()
            .iter()
            .find(|b| Ledger::hash_of(b) == hash)
            .context("Block not found")?
    };

    println!();
    println!("{}", "Block Information:".bold().cyan());
    println!();
    print_block(block);
    println!();

    Ok(())
}
