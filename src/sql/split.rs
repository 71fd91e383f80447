//! Partition cleaned DDL into `CREATE TABLE` chunks.

use crate::scan::{QuoteTracker, is_ident_char};

/// Text following each `CREATE TABLE` boundary, up to the next boundary.
///
/// An empty result means the input declares no tables at all. Text before
/// the first boundary is dropped.
pub fn split_statements(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut current: Option<usize> = None;
    let mut pos = 0;

    while let Some(offset) = find_create(&text[pos..]) {
        let at = pos + offset;
        match boundary_end(text, at) {
            Some(end) => {
                if let Some(start) = current {
                    chunks.push(&text[start..at]);
                }
                current = Some(end);
                pos = end;
            }
            None => pos = at + "CREATE".len(),
        }
    }

    if let Some(start) = current {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Offset of the next standalone `CREATE` word outside quoted runs,
/// case-insensitive. `text` must start outside any quote.
fn find_create(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quotes = QuoteTracker::new();
    text.char_indices().find_map(|(i, c)| {
        if quotes.step(c) {
            return None;
        }
        let word = bytes.get(i..i + 6)?;
        (word.eq_ignore_ascii_case(b"CREATE")
            && !preceded_by_ident(text, i)
            && !followed_by_ident(text, i + 6))
        .then_some(i)
    })
}

/// If a table boundary starts at `at`, the offset just past `TABLE`.
fn boundary_end(text: &str, at: usize) -> Option<usize> {
    let mut pos = at + "CREATE".len();
    pos = skip_required_space(text, pos)?;

    for modifier in ["TEMPORARY", "TEMP"] {
        if let Some(after) = keyword_at(text, pos, modifier) {
            pos = skip_required_space(text, after)?;
            break;
        }
    }

    keyword_at(text, pos, "TABLE")
}

fn keyword_at(text: &str, pos: usize, keyword: &str) -> Option<usize> {
    let end = pos + keyword.len();
    let candidate = text.as_bytes().get(pos..end)?;
    (candidate.eq_ignore_ascii_case(keyword.as_bytes()) && !followed_by_ident(text, end))
        .then_some(end)
}

fn skip_required_space(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    let trimmed = rest.trim_start();
    (trimmed.len() < rest.len()).then(|| pos + (rest.len() - trimmed.len()))
}

fn preceded_by_ident(text: &str, i: usize) -> bool {
    text[..i].chars().next_back().is_some_and(is_ident_char)
}

fn followed_by_ident(text: &str, i: usize) -> bool {
    text.get(i..)
        .and_then(|rest| rest.chars().next())
        .is_some_and(is_ident_char)
}
