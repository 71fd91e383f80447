//! Classification of a single table-body declaration.

use crate::scan::{ident_list, paren_group, unquote_ident, words};

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Column(ColumnDecl),
    PrimaryKey(Vec<String>),
    ForeignKey { columns: Vec<String>, target: String },
    /// Index, unique and check clauses carry nothing for the diagram.
    Ignored,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDecl {
    pub name: String,
    pub raw_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    /// Target table of an inline `REFERENCES` clause.
    pub references: Option<String>,
}

pub fn classify(line: &str) -> Declaration {
    let words = words(line);
    let Some(&first) = words.first() else {
        return Declaration::Unknown(line.to_string());
    };

    let (first_head, _) = paren_group(first);
    let keyword = first_head.to_ascii_uppercase();
    let decl = match keyword.as_str() {
        "PRIMARY" => primary_key(&words[1..]),
        "FOREIGN" => foreign_key(&words[1..]),
        "CONSTRAINT" => constraint(&words[1..]),
        "KEY" | "UNIQUE" | "INDEX" | "FULLTEXT" | "SPATIAL" | "CHECK" => Declaration::Ignored,
        _ => column(&words),
    };
    decl.or_unknown(line)
}

impl Declaration {
    fn or_unknown(self, line: &str) -> Self {
        match self {
            Self::Unknown(_) => Self::Unknown(line.to_string()),
            other => other,
        }
    }
}

/// `CONSTRAINT name <clause>` delegates to the clause after the name.
fn constraint(words: &[&str]) -> Declaration {
    let Some(pos) = words
        .iter()
        .position(|w| is_keyword(paren_group(w).0, "FOREIGN") || is_keyword(w, "PRIMARY"))
    else {
        return match words.get(1).map(|w| paren_group(w).0.to_ascii_uppercase()) {
            Some(kw) if matches!(kw.as_str(), "UNIQUE" | "CHECK" | "KEY" | "INDEX") => {
                Declaration::Ignored
            }
            _ => Declaration::Unknown(String::new()),
        };
    };

    if is_keyword(words[pos], "PRIMARY") {
        primary_key(&words[pos + 1..])
    } else {
        foreign_key(&words[pos + 1..])
    }
}

/// Words after `PRIMARY`: `KEY (a, b)` or `KEY(a, b)`.
fn primary_key(words: &[&str]) -> Declaration {
    match key_columns(words) {
        Some((columns, _)) if !columns.is_empty() => Declaration::PrimaryKey(columns),
        _ => Declaration::Unknown(String::new()),
    }
}

/// Words after `FOREIGN`: `KEY (cols) REFERENCES Target(...) [ON ...]`.
fn foreign_key(words: &[&str]) -> Declaration {
    let Some((columns, rest)) = key_columns(words) else {
        return Declaration::Unknown(String::new());
    };

    match references_target(rest) {
        Some(target) if !columns.is_empty() => Declaration::ForeignKey { columns, target },
        _ => Declaration::Unknown(String::new()),
    }
}

/// Parse `KEY [name] (cols)` and return the columns plus the remaining words.
fn key_columns<'a, 'w>(words: &'a [&'w str]) -> Option<(Vec<String>, &'a [&'w str])> {
    let (head, inner) = paren_group(words.first()?);
    if !is_keyword(head, "KEY") {
        return None;
    }
    if let Some(inner) = inner {
        return Some((ident_list(inner), &words[1..]));
    }

    // MySQL allows an index name between KEY and the column list
    for (i, word) in words.iter().enumerate().skip(1).take(2) {
        if let (_, Some(inner)) = paren_group(word) {
            return Some((ident_list(inner), &words[i + 1..]));
        }
    }
    None
}

/// Target table of `REFERENCES Target[(cols)]` at the start of `words`.
fn references_target(words: &[&str]) -> Option<String> {
    let (head, _) = paren_group(words.first()?);
    if !is_keyword(head, "REFERENCES") {
        return None;
    }
    // `REFERENCES(...)` without a table name is not a usable target
    if head.len() != words[0].len() && paren_group(words[0]).1.is_some() {
        return None;
    }

    let (target, _) = paren_group(words.get(1)?);
    let target = table_ident(target);
    (!target.is_empty()).then(|| target.to_string())
}

fn column(words: &[&str]) -> Declaration {
    let (Some(name), Some(ty)) = (words.first(), words.get(1)) else {
        return Declaration::Unknown(String::new());
    };

    let mut raw_type = ty.to_string();
    let mut rest = &words[2..];
    // `VARCHAR (255)` keeps its parameters
    if let Some(params) = rest.first().filter(|w| w.starts_with('(')) {
        raw_type.push_str(params);
        rest = &rest[1..];
    }

    let mut decl = ColumnDecl {
        name: unquote_ident(name).to_string(),
        raw_type,
        nullable: true,
        primary_key: false,
        references: None,
    };

    for (i, word) in rest.iter().enumerate() {
        let next = rest.get(i + 1).copied();
        if is_keyword(word, "NOT") && next.is_some_and(|n| is_keyword(n, "NULL")) {
            decl.nullable = false;
        } else if is_keyword(word, "PRIMARY") && next.is_some_and(|n| is_keyword(n, "KEY")) {
            decl.primary_key = true;
        } else if is_keyword(paren_group(word).0, "REFERENCES") && decl.references.is_none() {
            decl.references = references_target(&rest[i..]);
        }
    }

    Declaration::Column(decl)
}

/// Last segment of a possibly qualified table reference.
fn table_ident(text: &str) -> &str {
    let last = text.rsplit('.').next().unwrap_or(text);
    unquote_ident(last)
}

fn is_keyword(word: &str, keyword: &str) -> bool {
    word.eq_ignore_ascii_case(keyword)
}
