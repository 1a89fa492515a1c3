//! Mine a block from transactions given on the command line.

use super::{print_block, ChainArgs};
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct MineArgs {
    #[command(flatten)]
    chain: ChainArgs,

    /// Transaction as sender:recipient:amount (repeatable)
    #[arg(short, long = "tx", value_parser = parse_tx)]
    transactions: Vec<(String, String, String)>,
}

/// Split `sender:recipient:amount`. The amount is the last field so that
/// names may contain colons only in the sender position.
fn parse_tx(s: &str) -> Result<(String, String, String)> {
    let Some((rest, amount)) = s.rsplit_once(':') else {
        bail!("expected sender:recipient:amount, got {s:?}");
    };
    let Some((sender, recipient)) = rest.rsplit_once(':') else {
        bail!("expected sender:recipient:amount, got {s:?}");
    };
    if sender.is_empty() || recipient.is_empty() {
        bail!("sender and recipient must not be empty in {s:?}");
    }
    Ok((sender.to_string(), recipient.to_string(), amount.to_string()))
}

pub fn run(args: MineArgs) -> Result<()> {
    let mut ledger = args.chain.restore()?;

    for (sender, recipient, amount) in args.transactions {
        ledger
            .add_transaction(sender, recipient, amount.as_str())
            .context("Invalid transaction")?;
    }

    println!(
        "{} ({} pending, difficulty {})",
        "Mining block...".bold().cyan(),
        ledger.pending_count(),
        ledger.difficulty()
    );
    let block = ledger.mine_block().context("Failed to mine block")?;
    println!();
    println!("{}  Block mined", "✓".green().bold());
    print_block(block);

    ledger
        .persist(&args.chain.file)
        .with_context(|| format!("Failed to write {}", args.chain.file.display()))?;
    println!();

    Ok(())
}
