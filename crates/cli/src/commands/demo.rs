//! Sample run: two blocks of transfers between the usual suspects.

use super::{print_block, ChainArgs};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use powchain_chain::Ledger;

#[derive(Args)]
pub struct DemoArgs {
    #[command(flatten)]
    chain: ChainArgs,
}

const FIRST_BATCH: [(&str, &str, f64); 3] = [
    ("Satoshi", "Mike", 1.0),
    ("Mike", "Satoshi", 1.0),
    ("Satoshi", "Hal Finney", 5.0),
];

const SECOND_BATCH: [(&str, &str, f64); 3] = [
    ("Mike", "Alice", 1.0),
    ("Alice", "Bob", 0.5),
    ("Bob", "Mike", 0.2),
];

pub fn run(args: DemoArgs) -> Result<()> {
    let mut ledger = if Ledger::is_initialized(&args.chain.file) {
        args.chain.restore()?
    } else {
        Ledger::with_config(args.chain.ledger_config()?).context("Failed to mine genesis block")?
    };

    println!(
        "{} (difficulty {})",
        "Running demo...".bold().cyan(),
        ledger.difficulty()
    );
    println!();

    for batch in [FIRST_BATCH, SECOND_BATCH] {
        for (sender, recipient, amount) in batch {
            ledger.add_transaction(sender, recipient, amount)?;
        }
        let block = ledger.mine_block().context("Failed to mine block")?;
        println!("{}  Mined block", "✓".green().bold());
        print_block(block);
        println!();
    }

    ledger
        .persist(&args.chain.file)
        .with_context(|| format!("Failed to write {}", args.chain.file.display()))?;
    println!(
        "{}  Saved {} blocks to: {}",
        "✓".green().bold(),
        ledger.block_count(),
        args.chain.file.display().to_string().bright_black()
    );

    Ok(())
}
