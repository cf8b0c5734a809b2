//! Quire command line
//!
//! Lays out a JSON job into pages and prints the box trees or the finished
//! pages' display lists.

mod job;
mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use job::Job;

/// Quire: box-model layout of cascaded HTML into paged display lists
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Summarize the pages of a job
    quire report.json

    # Dump the display lists as JSON
    quire --format json report.json

    # Inspect the box trees at a fixed width
    quire --emit boxes --width 300 report.json

    # Show page master and layout diagnostics
    quire -v report.json
"#)]
struct Cli {
    /// Path to the JSON job file
    #[arg(value_name = "JOB")]
    job: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::DisplayList)]
    emit: Emit,

    /// Content width in points (default: the job's width, then the page's
    /// content width)
    #[arg(long)]
    width: Option<f32>,

    /// Log debug messages (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty-printed JSON
    Json,
    /// Colored text for the terminal
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Box trees, before placement
    Boxes,
    /// Finished pages with their display commands
    DisplayList,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let text = fs::read_to_string(&cli.job)
        .with_context(|| format!("reading {}", cli.job.display()))?;
    let job = Job::parse(&text)?;
    let base = cli.job.parent().unwrap_or_else(|| Path::new("."));

    match cli.emit {
        Emit::Boxes => {
            let boxes = job.boxes(base, cli.width)?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&boxes)?),
                Format::Summary => summary::print_boxes(&boxes),
            }
        }
        Emit::DisplayList => {
            let document = job.typeset(base, cli.width)?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&document)?),
                Format::Summary => summary::print_document(&document),
            }
        }
    }
    Ok(())
}
