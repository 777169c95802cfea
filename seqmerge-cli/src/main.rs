//! seqmerge - line-based diff, patch and three-way merge for text files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use seqmerge::text::{self, join, split_lines};
use seqmerge::xml::{self, PatchPrinterOptions};
use seqmerge::{Fallback, MergeConfig, PatchDocument, PatchPrinter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sequence diff and three-way merge tool
#[derive(Parser)]
#[command(name = "seqmerge")]
#[command(version)]
#[command(about = "Line-based diff, patch and three-way merge", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two versions relative to a common base
    #[command(visible_alias = "m")]
    Merge {
        /// Base file (common ancestor)
        base: String,
        /// Current version
        current: String,
        /// Next version
        next: String,
        /// Output file (default: stdout)
        output: Option<String>,

        /// Version that wins in conflicting regions
        #[arg(short, long, value_enum, default_value_t = FallbackArg::Current)]
        fallback: FallbackArg,

        /// Write conflicts and merge log as XML to this file
        #[arg(short, long)]
        conflicts: Option<String>,

        /// Merge word by word instead of line by line
        #[arg(short, long)]
        words: bool,
    },

    /// Write a patch turning base into branch
    #[command(visible_alias = "d")]
    Diff {
        /// Base file
        base: String,
        /// Branch file
        branch: String,
        /// Output file (default: stdout)
        output: Option<String>,
    },

    /// Apply a patch to a base file
    #[command(visible_alias = "p")]
    Patch {
        /// Base file
        base: String,
        /// Patch file (diff XML)
        patchfile: String,
        /// Output file (default: stdout)
        output: Option<String>,
    },

    /// Revert a patch on a branch file
    #[command(visible_alias = "r")]
    Restore {
        /// Branch file
        branch: String,
        /// Patch file (diff XML)
        patchfile: String,
        /// Output file (default: stdout)
        output: Option<String>,
    },
}

/// Conflict resolution policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FallbackArg {
    /// Keep the current version's edits
    Current,
    /// Keep the next version's edits
    Next,
    /// Keep the base content
    Previous,
}

impl From<FallbackArg> for Fallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Current => Fallback::Current,
            FallbackArg::Next => Fallback::Next,
            FallbackArg::Previous => Fallback::Previous,
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Merge {
            base,
            current,
            next,
            output,
            fallback,
            conflicts,
            words,
        } => run_merge(
            &base,
            &current,
            &next,
            output.as_deref(),
            fallback.into(),
            conflicts.as_deref(),
            words,
        ),
        Commands::Diff {
            base,
            branch,
            output,
        } => run_diff(&base, &branch, output.as_deref()),
        Commands::Patch {
            base,
            patchfile,
            output,
        } => run_patch(&base, &patchfile, output.as_deref()),
        Commands::Restore {
            branch,
            patchfile,
            output,
        } => run_restore(&branch, &patchfile, output.as_deref()),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber; `-v` takes precedence over `RUST_LOG`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_output(path: Option<&str>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}

fn read_lines(path: &str) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(split_lines(&text).into_iter().map(String::from).collect())
}

/// Runs the three-way merge.
fn run_merge(
    base_path: &str,
    current_path: &str,
    next_path: &str,
    output_path: Option<&str>,
    fallback: Fallback,
    conflicts_path: Option<&str>,
    words: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(base = base_path, current = current_path, next = next_path, "reading inputs");
    let base = fs::read_to_string(base_path)?;
    let current = fs::read_to_string(current_path)?;
    let next = fs::read_to_string(next_path)?;

    let config = MergeConfig::new().with_fallback(fallback);
    let result = if words {
        text::merge_words(&base, &current, &next, &config)?
    } else {
        text::merge_lines(&base, &current, &next, &config)?
    };

    let mut output = open_output(output_path)?;
    output.write_all(join(result.merged()).as_bytes())?;
    output.flush()?;

    if let Some(path) = conflicts_path {
        let mut writer = BufWriter::new(File::create(path)?);
        result.log().write_xml(&mut writer, result.conflicts())?;
        writer.flush()?;
    }

    if result.has_conflicts() {
        warn!(
            conflicts = result.conflicts().len(),
            fallback = fallback.name(),
            "merge complete with conflicts"
        );
    } else {
        info!("merge complete");
    }
    Ok(())
}

/// Writes the patch from base to branch as XML.
fn run_diff(
    base_path: &str,
    branch_path: &str,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(base = base_path, branch = branch_path, "reading inputs");
    let base = fs::read_to_string(base_path)?;
    let branch = fs::read_to_string(branch_path)?;

    let patch = text::diff_lines(&base, &branch);
    info!(deltas = patch.len(), "diff complete");
    let document = PatchDocument::new(patch, &split_lines(&base));

    let mut output = open_output(output_path)?;
    let options = PatchPrinterOptions { pretty_print: true };
    PatchPrinter::with_options(&mut output, options).print(&document)?;
    Ok(())
}

/// Applies a patch document to a base file.
fn run_patch(
    base_path: &str,
    patch_path: &str,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(base = base_path, patch = patch_path, "reading inputs");
    let base = read_lines(base_path)?;
    let document = xml::parse_file(patch_path)?;

    let patched = document.apply(&base)?;

    let mut output = open_output(output_path)?;
    output.write_all(join(&patched).as_bytes())?;
    output.flush()?;
    info!(deltas = document.patch().len(), "patch complete");
    Ok(())
}

/// Reverts a patch document on a branch file.
fn run_restore(
    branch_path: &str,
    patch_path: &str,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(branch = branch_path, patch = patch_path, "reading inputs");
    let branch = read_lines(branch_path)?;
    let document = xml::parse_file(patch_path)?;

    let restored = document.restore(&branch)?;

    let mut output = open_output(output_path)?;
    output.write_all(join(&restored).as_bytes())?;
    output.flush()?;
    info!(deltas = document.patch().len(), "restore complete");
    Ok(())
}
