//! Paren-depth scanning shared by the DDL tokenizer and the formatter.
//!
//! Every routine here is a single forward pass over the input, so the cost
//! is linear in its length no matter how deeply parentheses nest.

use std::ops::Range;

/// Nesting state of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenState {
    /// Not inside any parentheses.
    Outside,
    /// Directly inside one pair, e.g. a table body.
    Body,
    /// Inside a nested pair such as `DECIMAL(10,2)` in a body.
    Nested(usize),
}

/// Result of feeding one character to a [`DepthTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `(` was consumed; holds the depth after it.
    Opened(usize),
    /// `)` was consumed; holds the depth after it.
    Closed(usize),
    /// Any other character, or a `)` with nothing open.
    Other,
}

/// Depth counter driven only by `(` and `)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthTracker {
    depth: usize,
}

impl DepthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn state(&self) -> ParenState {
        match self.depth {
            0 => ParenState::Outside,
            1 => ParenState::Body,
            n => ParenState::Nested(n),
        }
    }

    pub fn step(&mut self, c: char) -> Step {
        match c {
            '(' => {
                self.depth += 1;
                Step::Opened(self.depth)
            }
            ')' if self.depth > 0 => {
                self.depth -= 1;
                Step::Closed(self.depth)
            }
            _ => Step::Other,
        }
    }
}

/// Whether `c` opens a quoted run: a `'...'` literal, a `"..."` literal or
/// identifier, or a `` `...` `` identifier.
pub fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

/// Tracks whether a scan is inside a quoted run.
///
/// A run ends at the same character that opened it. A doubled `''` escape
/// closes and reopens, so it needs no special case.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteTracker {
    open: Option<char>,
}

impl QuoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_quote(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one character. Returns `true` if it is a delimiter or quoted text.
    pub fn step(&mut self, c: char) -> bool {
        match self.open {
            Some(q) => {
                if c == q {
                    self.open = None;
                }
                true
            }
            None if is_quote(c) => {
                self.open = Some(c);
                true
            }
            None => false,
        }
    }
}

/// Characters outside quoted runs, with their byte offsets.
fn unquoted(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quotes = QuoteTracker::new();
    text.char_indices().filter(move |&(_, c)| !quotes.step(c))
}

/// Byte range strictly between the `(` at `open` and its matching `)`.
///
/// Returns `None` if `open` does not point at `(` or the paren never closes.
pub fn balanced_body(text: &str, open: usize) -> Option<Range<usize>> {
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }

    let mut tracker = DepthTracker::new();
    for (i, c) in unquoted(&text[open..]) {
        if let Step::Closed(0) = tracker.step(c) {
            return Some(open + 1..open + i);
        }
    }
    None
}

/// Split `text` on `sep`, ignoring separators nested inside parentheses or
/// quoted runs.
///
/// Pieces are returned untrimmed, so joining them with `sep` gives `text` back.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut tracker = DepthTracker::new();
    let mut start = 0;

    for (i, c) in unquoted(text) {
        tracker.step(c);
        if c == sep && tracker.depth() == 0 {
            pieces.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Split on whitespace that is outside parentheses and quoted runs.
///
/// `DECIMAL(10, 2)`, `'no default'` and `` `order id` `` each stay a single word.
pub fn words(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut tracker = DepthTracker::new();
    let mut quotes = QuoteTracker::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let quoted = quotes.step(c);
        if !quoted && c.is_whitespace() && tracker.depth() == 0 {
            if let Some(s) = start.take() {
                out.push(&text[s..i]);
            }
            continue;
        }

        if start.is_none() {
            start = Some(i);
        }
        if !quoted {
            tracker.step(c);
        }
    }

    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}

/// Split `Users(id)` into `("Users", Some("id"))`.
///
/// Anything after the first balanced group is discarded. A word without a
/// group yields `(word, None)`; an unclosed group is treated the same way.
pub fn paren_group(word: &str) -> (&str, Option<&str>) {
    match word.find('(') {
        Some(open) => match balanced_body(word, open) {
            Some(range) => (word[..open].trim_end(), Some(&word[range])),
            None => (word, None),
        },
        None => (word, None),
    }
}

/// Strip one layer of identifier quoting: `` `x` ``, `"x"` or `[x]`.
pub fn unquote_ident(ident: &str) -> &str {
    let ident = ident.trim();
    let mut chars = ident.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return ident;
    };

    let closes = match first {
        '`' => '`',
        '"' => '"',
        '[' => ']',
        _ => return ident,
    };
    if last == closes {
        &ident[first.len_utf8()..ident.len() - last.len_utf8()]
    } else {
        ident
    }
}

/// Comma-separated identifier list, e.g. the inside of `PRIMARY KEY (a, b)`.
pub fn ident_list(inner: &str) -> Vec<String> {
    split_top_level(inner, ',')
        .into_iter()
        .map(|part| {
            // `KEY (name(10))` prefix lengths are not part of the name
            let (head, _) = paren_group(part.trim());
            unquote_ident(head).to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Whether `c` can appear inside an unquoted SQL identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
