//! The entry transformer.
//!
//! Each entry is rewritten independently by four rules, in order:
//!
//! 1. fields in the removable set are deleted;
//! 2. `note` is deleted from every entry whose type is not `misc`;
//! 3. with `collapse_online`, an `online` entry that has a `url` is reduced
//!    to a single `note` field holding that URL;
//! 4. an `author` list with more than two commas is cut to the first author
//!    followed by `\textit{et al.}`.
//!
//! Inputs are never mutated; every call returns fresh entries.

use tracing::{debug, trace};

use crate::config::ShortenConfig;
use crate::entry::{Database, Entry};

/// Suffix appended to the first author when a list is shortened.
pub const ET_AL: &str = r" \textit{et al.}";

/// Number of commas above which an author list is shortened.
const AUTHOR_COMMA_THRESHOLD: usize = 2;

/// Counts of what a transformation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub entries: usize,
    pub fields_removed: usize,
    pub notes_removed: usize,
    pub online_collapsed: usize,
    pub authors_shortened: usize,
}

/// Transforms a single entry.
///
/// # Examples
///
/// ```
/// use bib_shorten::{transform, Entry, ShortenConfig};
///
/// let entry = Entry::new("article", "k")
///     .with_field("author", "Smith, John and Doe, Jane and Lee, Kim and Park, Sam")
///     .with_field("pages", "1--10");
///
/// let short = transform(&entry, &ShortenConfig::default());
/// assert_eq!(short.get("author"), Some(r"Smith \textit{et al.}, John"));
/// assert_eq!(short.get("pages"), None);
/// ```
pub fn transform(entry: &Entry, config: &ShortenConfig) -> Entry {
    apply_rules(entry, config, &mut TransformStats::default())
}

/// Transforms every entry of a database, preserving order.
///
/// `@string` definitions and preambles are carried over unchanged.
pub fn transform_database(db: &Database, config: &ShortenConfig) -> (Database, TransformStats) {
    let mut stats = TransformStats::default();

    let entries = db
        .entries
        .iter()
        .map(|entry| apply_rules(entry, config, &mut stats))
        .collect();
    stats.entries = db.entries.len();

    debug!(?stats, "transformed database");

    let database = Database {
        strings: db.strings.clone(),
        preambles: db.preambles.clone(),
        entries,
    };
    (database, stats)
}

fn apply_rules(entry: &Entry, config: &ShortenConfig, stats: &mut TransformStats) -> Entry {
    let mut out = entry.clone();

    for field in &config.removable_fields {
        if out.remove(field).is_some() {
            stats.fields_removed += 1;
        }
    }

    if out.entry_type() != "misc" && out.remove("note").is_some() {
        stats.notes_removed += 1;
    }

    if config.collapse_online && out.entry_type() == "online" {
        if let Some(url) = out.get("url").map(str::to_string) {
            out.clear_fields();
            out.set("note", url);
            stats.online_collapsed += 1;
            trace!(key = out.key(), "collapsed online entry");
        }
    }

    if let Some(short) = out.get("author").and_then(shorten_authors) {
        trace!(key = out.key(), author = %short, "shortened author list");
        out.set("author", short);
        stats.authors_shortened += 1;
    }

    out
}

/// Shortens an author list of the form `Last1, First1 and Last2, First2 and ...`.
///
/// Returns `None` when the list has at most two commas. Otherwise the part
/// before the first `" and"` is split on `", "`, the first piece gets the
/// [`ET_AL`] suffix, and the first two pieces are rejoined.
///
/// The comma count is a heuristic for "more than three authors"; names that
/// contain commas for other reasons (e.g. `Jr.`) skew it.
pub fn shorten_authors(authors: &str) -> Option<String> {
    if authors.matches(',').count() <= AUTHOR_COMMA_THRESHOLD {
        return None;
    }

    let first = match authors.find(" and") {
        Some(i) => &authors[..i],
        None => authors,
    };
    let mut parts = first.split(", ");
    let surname = parts.next().unwrap_or_default();

    Some(match parts.next() {
        Some(given) => format!("{}{}, {}", surname, ET_AL, given),
        None => format!("{}{}", surname, ET_AL),
    })
}
