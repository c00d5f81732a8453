//! BibTeX serialization.
//!
//! Output uses a canonical layout regardless of how the input was written:
//! macros first, then preambles, then entries in database order, each entry
//! with its fields sorted by name.

use crate::entry::{Database, Entry};

const INDENT: &str = " ";

/// Serializes a whole database.
///
/// Records are separated by a blank line and the result ends with a newline,
/// unless the database holds nothing at all.
///
/// # Examples
///
/// ```
/// use bib_shorten::{to_bibtex, Database, Entry};
///
/// let mut db = Database::new();
/// db.entries.push(
///     Entry::new("article", "k")
///         .with_field("title", "T")
///         .with_field("author", "A"),
/// );
///
/// assert_eq!(to_bibtex(&db), "@article{k,\n author = {A},\n title = {T}\n}\n");
/// ```
pub fn to_bibtex(db: &Database) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(
        db.strings.len() + db.preambles.len() + db.entries.len(),
    );

    blocks.extend(
        db.strings
            .iter()
            .map(|s| format!("@string{{{} = {{{}}}}}", s.name, s.value)),
    );
    blocks.extend(db.preambles.iter().map(|p| format!("@preamble{{{{{}}}}}", p)));
    blocks.extend(db.entries.iter().map(format_entry));

    if blocks.is_empty() {
        return String::new();
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

/// Serializes one entry, fields sorted by name.
pub fn format_entry(entry: &Entry) -> String {
    let mut fields: Vec<_> = entry.fields().iter().collect();
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let body = fields
        .iter()
        .map(|f| format!("{}{} = {{{}}}", INDENT, f.name, f.value))
        .collect::<Vec<_>>()
        .join(",\n");

    if body.is_empty() {
        format!("@{}{{{},\n}}", entry.entry_type(), entry.key())
    } else {
        format!("@{}{{{},\n{}\n}}", entry.entry_type(), entry.key(), body)
    }
}
