//! `CREATE TABLE` DDL to [`Schema`](crate::ast::Schema) conversion.

mod body;
mod classify;
pub(crate) mod lexer;
mod parser;
mod preprocess;
mod split;

pub use body::StatementError;
pub use parser::{ParseOutcome, ParseResult, Warning, parse_sql};
