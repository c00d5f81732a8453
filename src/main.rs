//! CLI for bib-shorten - Shorten a BibTeX file for compact bibliographies.

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};

use bib_shorten::{
    logging::{init_logging, level_from_verbosity},
    shorten_file, ShortenConfig, ShortenError,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Shorten a BibTeX file by replacing author lists of more than 3 authors with "et al."
#[derive(Parser)]
#[command(name = "bib-shorten")]
#[command(version)]
#[command(after_help = "\
The result is written next to the input: refs.bib -> refs_short.bib

Examples:
  bib-shorten refs.bib
  bib-shorten refs.bib --collapse-online
  bib-shorten refs.bib --remove pages --remove doi")]
struct Cli {
    /// Path to the input BibTeX file
    input: PathBuf,

    /// Reduce `online` entries to a single note holding their URL
    #[arg(long)]
    collapse_online: bool,

    /// Field to delete from every entry (repeatable; default: pages, address)
    #[arg(long = "remove", value_name = "FIELD")]
    remove: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> ShortenConfig {
        let config = ShortenConfig::default().with_collapse_online(self.collapse_online);
        if self.remove.is_empty() {
            config
        } else {
            config.with_removable_fields(self.remove.iter().cloned())
        }
    }
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — input file not found / unreadable
    InputFile(String),
    /// Exit 11 — input is not valid BibTeX
    Parse(String),
    /// Exit 15 — cannot write output file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::Parse(_) => 11,
            AppError::OutputFile(_) => 15,
        }
    }
}

impl From<ShortenError> for AppError {
    fn from(e: ShortenError) -> Self {
        match e {
            ShortenError::Read { .. } => AppError::InputFile(e.to_string()),
            ShortenError::Parse { .. } => AppError::Parse(e.to_string()),
            ShortenError::Write { .. } => AppError::OutputFile(e.to_string()),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::Parse(msg) => {
                write!(
                    f,
                    "{}\n  hint: entries must look like @type{{key, field = {{value}}, ...}}",
                    msg
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the input directory is writable",
                    msg
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(level_from_verbosity(cli.verbose));

    let report = shorten_file(&cli.input, &cli.config())?;

    let n = report.stats.entries;
    eprintln!(
        "shortened {} {}, wrote {}",
        n,
        if n == 1 { "entry" } else { "entries" },
        report.output.display()
    );

    Ok(())
}
