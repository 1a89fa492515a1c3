//! Run the proof-of-work engine on an arbitrary header.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use powchain_consensus::{timed_with_elapsed, PowConfig, ProofOfWork, GENESIS_HEADER, MAX_NONCE};

#[derive(Args)]
pub struct SearchArgs {
    /// Puzzle header
    #[arg(long, default_value = GENESIS_HEADER)]
    header: String,

    /// Difficulty in bits
    #[arg(short, long, default_value = "16")]
    difficulty: u32,

    /// Exclusive upper bound of the nonce space
    #[arg(long, default_value_t = MAX_NONCE)]
    max_nonce: u64,

    /// Search on all cores
    #[arg(long)]
    parallel: bool,
}

pub fn run(args: SearchArgs) -> Result<()> {
    let engine = ProofOfWork::new(PowConfig::new(args.max_nonce));

    let (solution, elapsed) = timed_with_elapsed("search", || {
        if args.parallel {
            engine.search_parallel(&args.header, args.difficulty)
        } else {
            engine.search(&args.header, args.difficulty)
        }
    });
    let solution = solution?;

    println!("{}  Solved", "✓".green().bold());
    println!("    Header:  {}", args.header.bright_black());
    println!("    Nonce:   {}", solution.nonce.to_string().bright_cyan());
    println!("    Digest:  {}", solution.digest.to_hex().bright_yellow());
    println!("    Elapsed: {}", format!("{:.3?}", elapsed).bright_black());

    Ok(())
}
