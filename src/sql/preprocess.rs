//! Comment stripping and directive extraction.

use crate::scan::QuoteTracker;

/// Cleaned DDL plus the directive bodies found along the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Preprocessed {
    pub text: String,
    /// Directive bodies in source order, without the `-- diagram:` prefix.
    pub directives: Vec<String>,
}

/// Remove `--` and `/* */` comments, pulling out directive lines.
///
/// `prefixes` lists the directive keywords (e.g. `diagram`), matched
/// case-insensitively. Comment markers inside quoted runs are kept.
pub fn preprocess<S: AsRef<str>>(input: &str, prefixes: &[S]) -> Preprocessed {
    let mut out = Preprocessed::default();
    let mut in_block = false;

    for line in input.split_inclusive('\n') {
        if !in_block {
            if let Some(directive) = match_directive(line, prefixes) {
                out.directives.push(directive.to_string());
                continue;
            }
        }
        in_block = strip_line(line, in_block, &mut out.text);
    }

    out
}

/// Returns the directive body if the whole line is a directive comment.
fn match_directive<'a, S: AsRef<str>>(line: &'a str, prefixes: &[S]) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix("--")?.trim_start();
    let (word, body) = rest.split_once(':')?;
    let word = word.trim_end();
    prefixes
        .iter()
        .any(|p| p.as_ref().eq_ignore_ascii_case(word))
        .then(|| body.trim())
}

/// Copy `line` into `out` without comments; returns whether a block comment
/// is still open at the end of the line.
fn strip_line(line: &str, mut in_block: bool, out: &mut String) -> bool {
    let mut chars = line.chars().peekable();
    let mut quotes = QuoteTracker::new();

    while let Some(c) = chars.next() {
        if in_block {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block = false;
                out.push(' ');
            } else if c == '\n' {
                // keep line structure through multi-line comments
                out.push('\n');
            }
            continue;
        }

        if quotes.step(c) {
            out.push(c);
            continue;
        }

        match c {
            '-' if chars.peek() == Some(&'-') => {
                if line.ends_with('\n') {
                    out.push('\n');
                }
                return false;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block = true;
            }
            _ => out.push(c),
        }
    }

    in_block
}
