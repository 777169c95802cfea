//! Example: 3-way merge of text files
//!
//! This example merges two edited versions of a text file line by line
//! and prints the result. Conflicts are listed on stderr.
//!
//! Usage: cargo run --example merge <base.txt> <current.txt> <next.txt>

use std::env;
use std::fs;

use seqmerge::text::{join, merge_lines};
use seqmerge::MergeConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 4 {
        eprintln!("Usage: {} <base.txt> <current.txt> <next.txt>", args[0]);
        std::process::exit(1);
    }

    let base = fs::read_to_string(&args[1])?;
    let current = fs::read_to_string(&args[2])?;
    let next = fs::read_to_string(&args[3])?;

    let result = merge_lines(&base, &current, &next, &MergeConfig::default())?;
    print!("{}", join(result.merged()));

    // Report conflicts if any
    if result.has_conflicts() {
        eprintln!("\nConflicts detected:");
        for conflict in result.conflicts() {
            eprintln!(
                "  line {}: current {:?} vs next {:?}",
                conflict.index() + 1,
                join(conflict.delta_current().next().elements()),
                join(conflict.delta_next().next().elements())
            );
        }
        std::process::exit(2);
    }

    for entry in result.log().entries() {
        eprintln!("  {:?}: {}", entry.severity, entry.text);
    }

    Ok(())
}
