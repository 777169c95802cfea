//! Example: Generate a patch between two text files
//!
//! This example diffs a base file against a modified version line by line
//! and prints the patch as an XML document.
//!
//! Usage: cargo run --example diff <base.txt> <modified.txt>

use std::env;
use std::fs;
use std::io;

use seqmerge::text::{diff_lines, split_lines};
use seqmerge::xml::PatchPrinterOptions;
use seqmerge::{PatchDocument, PatchPrinter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <base.txt> <modified.txt>", args[0]);
        std::process::exit(1);
    }

    let base = fs::read_to_string(&args[1])?;
    let modified = fs::read_to_string(&args[2])?;

    let patch = diff_lines(&base, &modified);
    if patch.is_empty() {
        eprintln!("Files are identical");
    }

    // Record the digest of the base so the patch only applies to it
    let document = PatchDocument::new(patch, &split_lines(&base));
    let options = PatchPrinterOptions { pretty_print: true };
    PatchPrinter::with_options(io::stdout(), options).print(&document)?;

    Ok(())
}
