use crate::error::{AppError, Result};
use crate::models::{Dataset, IndexRecord};
use csv::{ReaderBuilder, Trim};
use std::sync::Arc;

/// Parse the raw index dump into a dataset.
///
/// The first row names the columns. Every later row becomes one record, in
/// file order. Header names and values are trimmed, standard double-quote
/// escaping applies, and blank or whitespace-only lines are skipped. Malformed
/// quoting or a row whose width differs from the header fails the whole parse.
pub fn parse_records(text: &str) -> Result<Dataset> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    check_quoting(text)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers()?.clone();
    if header.is_empty() {
        return Ok(Dataset::empty());
    }
    let columns: Arc<[String]> = header.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;

        if row.len() != columns.len() {
            // A blank or whitespace-only line reads as one empty field
            if row.len() == 1 && row[0].is_empty() {
                continue;
            }
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            return Err(AppError::Parse(format!(
                "line {}: expected {} columns, found {}",
                line,
                columns.len(),
                row.len()
            )));
        }

        records.push(IndexRecord::new(
            columns.clone(),
            row.iter().map(str::to_string).collect(),
        ));
    }

    Ok(Dataset::new(columns, records))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    /// At the first byte of a field
    FieldStart,
    /// Inside a field that did not open with a quote
    Unquoted,
    /// Inside a quoted field
    Quoted,
    /// Just past the closing quote of a quoted field
    Closed,
}

/// Strict quoting check run before the lenient `csv` reader.
///
/// A quote may only open a field, `""` is the only escape inside a quoted
/// field, a closing quote must be followed by a delimiter or line break, and
/// no quoted field may still be open at the end of input.
fn check_quoting(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let mut state = QuoteState::FieldStart;
    let mut line = 1usize;
    let mut opened_at = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        state = match (state, b) {
            (QuoteState::Quoted, b'"') if bytes.get(i + 1) == Some(&b'"') => {
                i += 1;
                QuoteState::Quoted
            }
            (QuoteState::Quoted, b'"') => QuoteState::Closed,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::FieldStart, b'"') => {
                opened_at = line;
                QuoteState::Quoted
            }
            (QuoteState::Unquoted, b'"') => {
                return Err(AppError::Parse(format!(
                    "line {}: quote inside unquoted field",
                    line
                )));
            }
            (_, b',' | b'\r' | b'\n') => QuoteState::FieldStart,
            (QuoteState::Closed, other) => {
                return Err(AppError::Parse(format!(
                    "line {}: unexpected {:?} after closing quote",
                    line,
                    other as char
                )));
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, _) => QuoteState::Unquoted,
        };
        if b == b'\n' {
            line += 1;
        }
        i += 1;
    }

    if state == QuoteState::Quoted {
        return Err(AppError::Parse(format!(
            "line {}: quoted field never closed",
            opened_at
        )));
    }
    Ok(())
}
