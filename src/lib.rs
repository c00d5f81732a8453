//! bib-shorten: shorten BibTeX databases for space-constrained bibliographies.
//!
//! This library provides functionality to:
//! - Parse BibTeX databases (`@string`, `@preamble`, `@comment` and entries)
//! - Strip removable fields and notes, elide long author lists with "et al."
//! - Optionally collapse `online` entries to a URL note
//! - Write the result back in a canonical layout next to the input file

pub mod config;
pub mod encoding;
pub mod entry;
pub mod logging;
pub mod output;
pub mod parser;
pub mod transform;
pub mod writer;

pub use config::{ShortenConfig, DEFAULT_REMOVABLE_FIELDS};
pub use encoding::{decode, SourceEncoding};
pub use entry::{Database, Entry, Field, StringDef};
pub use output::{output_path, shorten_file, Report, ShortenError};
pub use parser::{parse, ParseError};
pub use transform::{shorten_authors, transform, transform_database, TransformStats};
pub use writer::{format_entry, to_bibtex};
