//! BibTeX parser built on nom.
//!
//! Handles the subset of the format found in real-world databases:
//! - `@type{key, name = value, ...}` entries (braces or parentheses)
//! - `@string` macro definitions, expanded in later field values
//! - `@preamble` blocks
//! - `@comment` blocks and `%` line comments
//! - braced, quoted, numeric and macro values, concatenated with `#`
//!
//! Unlike a lenient reader, any malformed record is fatal: the whole parse
//! fails with the position of the offending input.

use std::collections::{HashMap, HashSet};

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    IResult,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::entry::{Database, Entry, StringDef};

/// A fatal syntax error, positioned at 1-based line and column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(source, offset);
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Parses a complete BibTeX database.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first malformed record or duplicate
/// citation key. No partial database is returned.
///
/// # Examples
///
/// ```
/// use bib_shorten::parse;
///
/// let db = parse("@article{key, author = {Doe, Jane}, year = 2020}").unwrap();
/// assert_eq!(db.entries[0].get("author"), Some("Doe, Jane"));
/// assert_eq!(db.entries[0].get("year"), Some("2020"));
/// ```
pub fn parse(input: &str) -> Result<Database, ParseError> {
    let mut db = Database::new();
    let mut macros: HashMap<String, String> = HashMap::new();
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut remaining = input;

    loop {
        remaining = skip_junk(remaining);
        if remaining.is_empty() {
            break;
        }

        let start = offset_of(input, remaining);
        let (rest, record) = parse_record(remaining, &macros)
            .map_err(|e| record_error(input, remaining, e))?;

        match record {
            Record::Entry(entry) => {
                if !seen_keys.insert(entry.key().to_string()) {
                    return Err(ParseError::at(
                        input,
                        start,
                        format!("duplicate citation key '{}'", entry.key()),
                    ));
                }
                trace!(key = entry.key(), entry_type = entry.entry_type(), "parsed entry");
                db.entries.push(entry);
            }
            Record::String(def) => {
                macros.insert(def.name.to_lowercase(), def.value.clone());
                db.strings.push(def);
            }
            Record::Preamble(text) => db.preambles.push(text),
            Record::Comment => {}
        }

        remaining = rest;
    }

    debug!(
        entries = db.entries.len(),
        strings = db.strings.len(),
        preambles = db.preambles.len(),
        "parsed database"
    );

    Ok(db)
}

/// One top-level `@` block.
enum Record {
    Entry(Entry),
    String(StringDef),
    Preamble(String),
    Comment,
}

/// Skips whitespace, `%` comments, and any free text up to the next `@`.
///
/// A `%` comment runs to the end of its line, so an `@` inside it never
/// starts a record.
fn skip_junk(input: &str) -> &str {
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('@') {
            return rest;
        }
        if rest.starts_with('%') {
            rest = skip_line(rest);
            continue;
        }

        // Free text: stop at a record, a comment, or the end of the line.
        match rest.find(['@', '%', '\n']) {
            Some(pos) if rest.as_bytes()[pos] == b'\n' => rest = &rest[pos + 1..],
            Some(pos) => rest = &rest[pos..],
            None => return "",
        }
    }
}

fn skip_line(input: &str) -> &str {
    match input.find('\n') {
        Some(pos) => &input[pos + 1..],
        None => "",
    }
}

fn parse_record<'a>(input: &'a str, macros: &HashMap<String, String>) -> IResult<&'a str, Record> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, kind) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(rest)?;
    let (rest, _) = multispace0(rest)?;

    match kind.to_lowercase().as_str() {
        "comment" => {
            let rest = skip_comment_body(rest);
            Ok((rest, Record::Comment))
        }
        "string" => {
            let (rest, close) = open_delimiter(rest)?;
            let (rest, (name, value)) = parse_assignment(rest, macros)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, _) = char(close)(rest)?;
            Ok((rest, Record::String(StringDef { name, value })))
        }
        "preamble" => {
            let (rest, close) = open_delimiter(rest)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, value) = parse_value(rest, macros)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, _) = char(close)(rest)?;
            Ok((rest, Record::Preamble(value)))
        }
        _ => {
            let (rest, entry) = parse_entry_body(rest, kind, macros)?;
            Ok((rest, Record::Entry(entry)))
        }
    }
}

/// Consumes `{` or `(` and returns the matching closing character.
fn open_delimiter(input: &str) -> IResult<&str, char> {
    alt((map(char('{'), |_| '}'), map(char('('), |_| ')')))(input)
}

fn skip_comment_body(input: &str) -> &str {
    if input.starts_with('{') {
        if let Ok((rest, _)) = parse_braced_content(input) {
            return rest;
        }
    }
    let pos = input.find('\n').unwrap_or(input.len());
    &input[pos..]
}

fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, Entry> {
    let (rest, close) = open_delimiter(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) = take_while1(|c: char| {
        !c.is_whitespace() && !matches!(c, ',' | '{' | '}' | '(' | ')' | '"' | '=' | '#')
    })(rest)?;
    let (mut rest, _) = multispace0(rest)?;

    let mut entry = Entry::new(entry_type, key);

    loop {
        if let Ok((after, _)) = char::<_, nom::error::Error<&str>>(close)(rest) {
            return Ok((after, entry));
        }
        let (after, _) = char(',')(rest)?;
        let (after, _) = multispace0(after)?;

        // Trailing comma before the closing delimiter.
        if let Ok((after, _)) = char::<_, nom::error::Error<&str>>(close)(after) {
            return Ok((after, entry));
        }

        let (after, (name, value)) = parse_assignment(after, macros)?;
        entry.set(&name, value);
        let (after, _) = multispace0(after)?;
        rest = after;
    }
}

/// Parses `name = value`.
fn parse_assignment<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, name) = take_while1(is_name_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_value(rest, macros)?;

    Ok((rest, (name.to_string(), value)))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '+' | '/')
}

/// Parses a value: one or more pieces joined with `#`.
fn parse_value<'a>(input: &'a str, macros: &HashMap<String, String>) -> IResult<&'a str, String> {
    let mut result = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        let (rest, part) = alt((
            parse_braced_value,
            parse_quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
            map(take_while1(is_name_char), |s: &str| {
                macros
                    .get(&s.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| s.to_string())
            }),
        ))(rest)?;
        result.push_str(&part);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, result)),
        }
    }
}

fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    Ok((rest, content[1..content.len() - 1].to_string()))
}

/// Matches `{...}` with nested braces, returning the span including the outer braces.
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom_error(input));
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(nom_failure(&input[input.len()..]))
}

/// Matches `"..."`; quotes inside braces do not terminate the value.
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return Err(nom_error(input));
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' if depth == 0 => return Ok((&input[pos + 1..], input[1..pos].to_string())),
            b'{' => depth += 1,
            b'}' if depth == 0 => return Err(nom_failure(&input[pos..])),
            b'}' => depth -= 1,
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(nom_failure(&input[input.len()..]))
}

fn nom_error(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char))
}

/// An unterminated value cannot be rescued by another alternative.
fn nom_failure(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Eof))
}

/// Converts a nom error inside the record starting at `record` into a positioned error.
fn record_error(
    source: &str,
    record: &str,
    err: nom::Err<nom::error::Error<&str>>,
) -> ParseError {
    let kind = record
        .trim_start_matches('@')
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .next()
        .unwrap_or_default();
    let failed_at = match &err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => &record[record.len()..],
    };
    let found = match failed_at.chars().next() {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    };
    let (line, _) = line_column(source, offset_of(source, record));

    ParseError::at(
        source,
        offset_of(source, failed_at),
        format!(
            "malformed @{} record starting at line {}: unexpected {}",
            kind, line, found
        ),
    )
}

/// Byte offset of `tail` within `source`; `tail` must be a suffix of `source`.
fn offset_of(source: &str, tail: &str) -> usize {
    source.len() - tail.len()
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
