//! Output path derivation and the end-to-end file operation.
//!
//! The shortened database is fully built in memory before anything touches
//! the disk, and it is written through a uniquely named temporary file in
//! the output directory that is renamed into place, so a failed run never
//! leaves a partial output file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ShortenConfig;
use crate::encoding::{decode, SourceEncoding};
use crate::parser::{parse, ParseError};
use crate::transform::{transform_database, TransformStats};
use crate::writer::to_bibtex;

const BIB_EXTENSION: &str = ".bib";
const SHORT_SUFFIX: &str = "_short.bib";

/// Errors from [`shorten_file`], each tagged with the path involved.
#[derive(Error, Debug)]
pub enum ShortenError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub output: PathBuf,
    pub encoding: SourceEncoding,
    pub stats: TransformStats,
}

/// Derives the output path: a trailing `.bib` is dropped and `_short.bib` appended.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use bib_shorten::output_path;
///
/// assert_eq!(output_path(Path::new("refs/main.bib")), PathBuf::from("refs/main_short.bib"));
/// assert_eq!(output_path(Path::new("main")), PathBuf::from("main_short.bib"));
/// ```
pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(BIB_EXTENSION).unwrap_or(&name);
    input.with_file_name(format!("{}{}", stem, SHORT_SUFFIX))
}

/// Shortens a BibTeX file, writing the result next to it.
///
/// The output keeps the input's encoding: UTF-8 (and its BOM, if any) or,
/// for input that is not valid UTF-8, windows-1252.
///
/// # Errors
///
/// Fails if the input cannot be read, does not parse, or the output cannot
/// be written. In every failure case no output file is created.
pub fn shorten_file(input: &Path, config: &ShortenConfig) -> Result<Report, ShortenError> {
    let bytes = fs::read(input).map_err(|source| ShortenError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let (content, encoding) = decode(&bytes);
    debug!(
        path = %input.display(),
        bytes = bytes.len(),
        encoding = encoding.name(),
        "read input"
    );

    let db = parse(&content).map_err(|source| ShortenError::Parse {
        path: input.to_path_buf(),
        source,
    })?;

    let (short, stats) = transform_database(&db, config);
    let rendered = encoding.encode(&to_bibtex(&short));

    let output = output_path(input);
    write_atomic(&output, &rendered).map_err(|source| ShortenError::Write {
        path: output.clone(),
        source,
    })?;
    info!(
        output = %output.display(),
        entries = stats.entries,
        authors_shortened = stats.authors_shortened,
        "wrote shortened database"
    );

    Ok(Report {
        output,
        encoding,
        stats,
    })
}

/// Writes `contents` to a fresh temporary file next to `path`, then renames it into place.
///
/// The temporary file is removed if anything fails before the rename.
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
