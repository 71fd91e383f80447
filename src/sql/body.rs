//! Table name and body extraction for a single `CREATE TABLE` chunk.

use crate::scan::{balanced_body, is_ident_char, split_top_level, unquote_ident};
use thiserror::Error;

/// Why a chunk could not be turned into a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    #[error("missing table name")]
    MissingName,
    #[error("missing parenthesized table body")]
    MissingBody,
    #[error("unbalanced parentheses in table body")]
    UnbalancedParens,
}

/// A table name and its top-level declarations, borrowed from the chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBody<'a> {
    pub name: &'a str,
    pub declarations: Vec<&'a str>,
}

/// Split a chunk (the text after `CREATE TABLE`) into name and declarations.
pub fn tokenize_table(chunk: &str) -> Result<TableBody<'_>, StatementError> {
    let rest = skip_if_not_exists(chunk.trim_start());
    let (name, after_name) = read_table_name(rest).ok_or(StatementError::MissingName)?;

    let open = after_name.find('(').ok_or(StatementError::MissingBody)?;
    let range = balanced_body(after_name, open).ok_or(StatementError::UnbalancedParens)?;

    let declarations = split_top_level(&after_name[range], ',')
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    Ok(TableBody { name, declarations })
}

fn skip_if_not_exists(text: &str) -> &str {
    let mut rest = text;
    for keyword in ["IF", "NOT", "EXISTS"] {
        match strip_keyword(rest, keyword) {
            Some(after) => rest = after.trim_start(),
            None => return text,
        }
    }
    rest
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    let after = &text[keyword.len()..];
    let boundary = after.chars().next().is_none_or(|c| !is_ident_char(c));
    (head.eq_ignore_ascii_case(keyword) && boundary).then_some(after)
}

/// Read a possibly quoted, possibly schema-qualified name. Returns the last
/// segment and the text after the whole name.
fn read_table_name(text: &str) -> Option<(&str, &str)> {
    let mut rest = text;
    loop {
        let (segment, after) = read_segment(rest)?;
        match after.trim_start().strip_prefix('.') {
            Some(next) => rest = next.trim_start(),
            None => return Some((segment, after)),
        }
    }
}

fn read_segment(text: &str) -> Option<(&str, &str)> {
    let first = text.chars().next()?;
    let close = match first {
        '`' => Some('`'),
        '"' => Some('"'),
        '[' => Some(']'),
        _ => None,
    };

    let end = match close {
        Some(close) => text[1..].find(close).map(|i| i + 2)?,
        None => text
            .char_indices()
            .find(|&(_, c)| !is_ident_char(c))
            .map_or(text.len(), |(i, _)| i),
    };

    let segment = unquote_ident(&text[..end]);
    (!segment.is_empty()).then(|| (segment, &text[end..]))
}
