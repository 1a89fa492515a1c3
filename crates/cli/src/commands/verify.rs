//! Chain verification command.

use super::ChainArgs;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    chain: ChainArgs,

    /// Also re-check every proof of work
    #[arg(long)]
    proofs: bool,
}

pub fn run(args: VerifyArgs) -> Result<()> {
    // Restoring already checks linkage.
    let ledger = args.chain.restore()?;
    println!(
        "{}  Hash linkage intact across {} blocks",
        "✓".green().bold(),
        ledger.block_count()
    );

    if args.proofs {
        ledger.verify_proofs().with_context(|| {
            format!(
                "Proof check failed at difficulty {}. Pass -d if the chain was mined at another difficulty",
                ledger.difficulty()
            )
        })?;
        println!(
            "{}  Every proof solves its puzzle at difficulty {}",
            "✓".green().bold(),
            ledger.difficulty()
        );
    }

    Ok(())
}
