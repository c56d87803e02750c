mod convert;
mod discover;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::convert::{Runner, Summary};

#[derive(Parser, Debug)]
#[command(
    name = "phpjson",
    version,
    about = "Convert PHP language-array files to JSON, verifying data integrity first"
)]
struct Args {
    /// Root directory to scan for .php files (default: current directory).
    root: Option<PathBuf>,

    /// Re-convert files whose .json output already exists.
    #[arg(long)]
    force: bool,

    /// Delete source files after successful integrity verification.
    #[arg(long)]
    delete: bool,

    /// Answer yes to all confirmation prompts.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Skip the per-file backup copies.
    #[arg(long)]
    no_backup: bool,

    /// Maximum parse attempts per file.
    #[arg(long, value_name = "count", default_value_t = 3)]
    max_retries: u32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<Summary, Box<dyn Error>> {
    let root = match args.root {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let files = discover::php_files(&root, !args.force)?;
    if files.is_empty() {
        println!("no PHP files to convert");
        return Ok(Summary::default());
    }

    // Deletion is destructive: without --yes it takes two confirmations.
    let delete = args.delete && (args.yes || confirm_delete()?);

    let mut runner = Runner::new(root, !args.no_backup, delete, args.max_retries)?;
    let summary = runner.process(&files);
    print_summary(&summary);
    Ok(summary)
}

fn confirm_delete() -> io::Result<bool> {
    Ok(prompt("Delete source files after verified conversion? (y/N): ")?
        && prompt("Deleted files are only recoverable from the backup. Really delete? (y/N): ")?)
}

fn prompt(message: &str) -> io::Result<bool> {
    print!("{message}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_summary(summary: &Summary) {
    println!(
        "converted {}/{} files ({} verified, {} failed, {} deleted)",
        summary.converted, summary.total, summary.verified, summary.failed, summary.deleted
    );
    if summary.total > 0 {
        println!(
            "success rate: {:.1}%, integrity rate: {:.1}%",
            percent(summary.converted, summary.total),
            percent(summary.verified, summary.converted.max(1)),
        );
    }
    for (path, reason) in &summary.failures {
        println!("failed: {}: {reason}", path.display());
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 * 100.0 / whole as f64
}
