//! Initialize chain command.

use super::{print_block, ChainArgs};
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use powchain_chain::Ledger;

#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    chain: ChainArgs,

    /// Overwrite an existing chain file
    #[arg(long)]
    force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = &args.chain.file;
    if Ledger::is_initialized(path) && !args.force {
        bail!(
            "{} already exists. Use --force to replace it.",
            path.display()
        );
    }

    let config = args.chain.ledger_config()?;
    println!("{}", "Initializing powchain...".bold().cyan());
    println!(
        "  Mining genesis block at difficulty {}",
        config.difficulty.to_string().bright_cyan()
    );
    println!();

    let ledger = Ledger::with_config(config).context("Failed to mine genesis block")?;
    ledger
        .persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{}  Created genesis block", "✓".green().bold());
    print_block(ledger.last_block()?);
    println!();
    println!(
        "{}  Saved chain to: {}",
        "✓".green().bold(),
        path.display().to_string().bright_black()
    );

    println!();
    println!("Next steps:");
    println!(
        "  • Use {} to add transactions and mine a block",
        "powchain mine --tx sender:recipient:amount".bright_cyan()
    );
    println!(
        "  • Use {} to explore blocks",
        "powchain block list".bright_cyan()
    );

    Ok(())
}
