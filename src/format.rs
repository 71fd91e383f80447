//! DDL re-indenting for display.
//!
//! Top-level declarations inside a table body go on their own indented
//! lines. Everything nested deeper only has its whitespace normalized, and
//! string literals and comments pass through untouched. Formatting is
//! idempotent.

use crate::config::FormatConfig;
use crate::scan::{DepthTracker, ParenState, Step};
use crate::sql::lexer::{Atom, Lexer, Token};

pub fn format(input: &str) -> String {
    format_with(input, &FormatConfig::default())
}

pub fn format_with(input: &str, config: &FormatConfig) -> String {
    let mut f = Formatter {
        out: String::with_capacity(input.len() + input.len() / 4),
        indent: " ".repeat(config.indent),
        tracker: DepthTracker::new(),
        prev: None,
        line_start: true,
        pending_break: false,
    };
    for atom in Lexer::new(input) {
        f.push(atom);
    }
    let len = f.out.trim_end().len();
    f.out.truncate(len);
    f.out
}

struct Formatter<'a> {
    out: String,
    indent: String,
    tracker: DepthTracker,
    prev: Option<Token<'a>>,
    /// Nothing but indentation has been written on the current line.
    line_start: bool,
    /// A line break is owed after `(` or a top-level `,`. It is held back so
    /// a trailing line comment can stay on the same line.
    pending_break: bool,
}

impl<'a> Formatter<'a> {
    fn push(&mut self, atom: Atom<'a>) {
        if self.pending_break {
            self.pending_break = false;
            if let Token::LineComment(text) = atom.token {
                self.out.push(' ');
                self.out.push_str(text);
                self.newline();
                self.prev = Some(atom.token);
                return;
            }
            self.newline();
        }

        match atom.token {
            Token::Word(text) if self.starts_statement(text) => {
                self.trim_spaces();
                self.out.push_str("\n\n");
                self.out.push_str(text);
                self.line_start = false;
            }
            Token::Word(text) | Token::Str(text) | Token::BlockComment(text) => {
                if !self.line_start && self.wants_space(atom.spaced) {
                    self.out.push(' ');
                }
                self.out.push_str(text);
                self.line_start = false;
            }
            Token::LineComment(text) => {
                if !self.line_start {
                    self.trim_spaces();
                    self.out.push(' ');
                }
                self.out.push_str(text);
                self.newline();
            }
            Token::LParen => {
                let spaced = !self.line_start && self.wants_space(atom.spaced);
                match self.tracker.step('(') {
                    Step::Opened(1) => {
                        self.trim_spaces();
                        if !self.line_start {
                            self.out.push(' ');
                        }
                        self.out.push('(');
                        self.pending_break = true;
                        self.line_start = false;
                    }
                    _ => {
                        if spaced {
                            self.out.push(' ');
                        }
                        self.out.push('(');
                        self.line_start = false;
                    }
                }
            }
            Token::RParen => {
                self.trim_spaces();
                if let Step::Closed(0) = self.tracker.step(')') {
                    if !self.out.is_empty() && !self.out.ends_with('\n') {
                        self.out.push('\n');
                    }
                }
                self.out.push(')');
                self.line_start = false;
            }
            Token::Comma => {
                self.trim_spaces();
                self.out.push(',');
                if self.tracker.state() == ParenState::Body {
                    self.pending_break = true;
                } else {
                    self.out.push(' ');
                    self.line_start = false;
                }
            }
            Token::Semicolon => {
                self.trim_spaces();
                self.out.push_str(";\n\n");
                self.line_start = true;
            }
        }
        self.prev = Some(atom.token);
    }

    /// A `CREATE` right after a closed table body begins a statement that
    /// had no `;` before it.
    fn starts_statement(&self, word: &str) -> bool {
        self.prev == Some(Token::RParen)
            && self.tracker.depth() == 0
            && word.eq_ignore_ascii_case("CREATE")
    }

    /// Whether a text atom or nested `(` gets a space after the previous atom.
    fn wants_space(&self, spaced: bool) -> bool {
        match self.prev {
            Some(Token::RParen) => true,
            Some(Token::Word(_) | Token::Str(_) | Token::BlockComment(_)) => spaced,
            _ => false,
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        if self.tracker.depth() > 0 {
            self.out.push_str(&self.indent);
        }
        self.line_start = true;
    }

    fn trim_spaces(&mut self) {
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_formats_tables() {
        let input = "create table Users(id INT  PRIMARY KEY ,email VARCHAR( 255 ) NOT NULL);CREATE TABLE Orders (id INT, price DECIMAL(10,2), user_id INT, FOREIGN KEY (user_id) REFERENCES Users(id));";
        let expected = "\
create table Users (
    id INT PRIMARY KEY,
    email VARCHAR(255) NOT NULL
);

CREATE TABLE Orders (
    id INT,
    price DECIMAL(10, 2),
    user_id INT,
    FOREIGN KEY (user_id) REFERENCES Users(id)
);";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_trailing_options_and_strings() {
        let input = "CREATE TABLE t (a CHAR(1) DEFAULT 'x,  y', b INT) ENGINE=InnoDB;";
        let expected = "CREATE TABLE t (\n    a CHAR(1) DEFAULT 'x,  y',\n    b INT\n) ENGINE=InnoDB;";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_comments_survive() {
        let input = "-- users\nCREATE TABLE u ( id INT, -- key\n name TEXT )";
        let expected = "-- users\nCREATE TABLE u (\n    id INT, -- key\n    name TEXT\n)";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_statements_without_semicolons() {
        let input = "CREATE TABLE a (x INT) CREATE TABLE b (y INT)";
        let expected = "CREATE TABLE a (\n    x INT\n)\n\nCREATE TABLE b (\n    y INT\n)";
        assert_eq!(format(input), expected);
        assert_eq!(format(expected), expected);
        assert_eq!(format("t (a INT) ENGINE=InnoDB"), "t (\n    a INT\n) ENGINE=InnoDB");
    }

    #[test]
    fn test_custom_indent() {
        let config = FormatConfig { indent: 2 };
        assert_eq!(format_with("t (a INT, b INT)", &config), "t (\n  a INT,\n  b INT\n)");
    }

    #[test]
    fn test_empty_and_stray_parens() {
        assert_eq!(format(""), "");
        assert_eq!(format("  \n "), "");
        assert_eq!(format("a ) b"), "a) b");
        assert_eq!(format("t ()"), "t (\n)");
    }

    #[test]
    fn test_idempotent_examples() {
        for input in [
            "CREATE TABLE a (x INT, y INT,);",
            "a /* c */b ,( c,d) ; ; 'q' 'r'",
            "CREATE TABLE t (a INT -- trailing\n)",
            "t (a (b (c, d), e), f)",
            "CREATE TABLE a (x INT)create TABLE b (\"y z\" INT, `w` INT)",
        ] {
            let once = format(input);
            assert_eq!(format(&once), once, "{input:?}");
        }
    }

    fn check_idempotent(input: &str) -> Result<(), TestCaseError> {
        let once = format(input);
        let twice = format(&once);
        prop_assert_eq!(twice, once);
        Ok(())
    }

    proptest! {
        #[test]
        fn format_is_idempotent(input in "[a-c ,;()'\\-/*\n]{0,60}") {
            check_idempotent(&input)?;
        }

        #[test]
        fn ddl_format_is_idempotent(
            cols in prop::collection::vec(("[a-z]{1,6}", "(INT|VARCHAR\\(16\\)|DECIMAL\\(10, ?2\\))"), 1..8)
        ) {
            let body: Vec<String> = cols.iter().map(|(n, t)| format!("{n}   {t}")).collect();
            let ddl = format!("CREATE TABLE t({});", body.join(" ,"));
            check_idempotent(&ddl)?;
        }
    }
}
