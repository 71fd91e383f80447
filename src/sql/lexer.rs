//! Layout-preserving SQL lexer used by the formatter.
//!
//! Unlike a parsing lexer this keeps every atom's source text, including
//! comments and string literals, so nothing is rewritten on output.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::scan::is_quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    /// Quoted literal or identifier (`'..'`, `".."` or `` `..` ``), quotes included.
    Str(&'a str),
    LineComment(&'a str),
    BlockComment(&'a str),
    LParen,
    RParen,
    Comma,
    Semicolon,
}

/// A token and whether whitespace separated it from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom<'a> {
    pub token: Token<'a>,
    pub spaced: bool,
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    /// Byte offset of the next char, or the end of input.
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    fn starts_comment(&self, at: usize) -> bool {
        let rest = &self.input[at..];
        rest.starts_with("--") || rest.starts_with("/*")
    }

    fn read_line_comment(&mut self, start: usize) -> &'a str {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.chars.next();
        }
        let input = self.input;
        input[start..self.offset()].trim_end()
    }

    fn read_block_comment(&mut self, start: usize) -> &'a str {
        let input = self.input;
        self.chars.next(); // skip *
        let mut prev = '\0';
        for (i, c) in self.chars.by_ref() {
            if prev == '*' && c == '/' {
                return &input[start..i + 1];
            }
            prev = c;
        }
        &input[start..]
    }

    fn read_string(&mut self, start: usize, quote: char) -> &'a str {
        let input = self.input;
        while let Some((i, c)) = self.chars.next() {
            if c == quote {
                // Doubled quote is an escape, not the end
                if matches!(self.chars.peek(), Some(&(_, q)) if q == quote) {
                    self.chars.next();
                    continue;
                }
                return &input[start..i + 1];
            }
        }
        &input[start..]
    }

    fn read_word(&mut self, start: usize) -> &'a str {
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | ',' | ';') || is_quote(c) || self.starts_comment(i) {
                break;
            }
            self.chars.next();
        }
        let input = self.input;
        &input[start..self.offset()]
    }

    pub fn next_atom(&mut self) -> Option<Atom<'a>> {
        let spaced = self.skip_whitespace();
        let (start, c) = self.chars.next()?;

        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            q if is_quote(q) => Token::Str(self.read_string(start, q)),
            '-' if self.input[start..].starts_with("--") => {
                Token::LineComment(self.read_line_comment(start))
            }
            '/' if self.input[start..].starts_with("/*") => {
                Token::BlockComment(self.read_block_comment(start))
            }
            _ => Token::Word(self.read_word(start)),
        };

        Some(Atom { token, spaced })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Atom<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_atom()
    }
}
