//! DDL to [`Schema`] pipeline.

use log::{debug, trace};
use thiserror::Error;

use super::body::{StatementError, tokenize_table};
use super::classify::{Declaration, classify};
use super::preprocess::preprocess;
use super::split::split_statements;
use crate::ast::{Column, Schema};
use crate::builder::{SchemaBuilder, TableBuilder};
use crate::config::ParseConfig;
use crate::directive::parse_directive;

/// Problems recovered from while parsing. None of them stop the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("Skipped table statement #{chunk_index}: {reason}")]
    MalformedStatement {
        chunk_index: usize,
        reason: StatementError,
    },
    #[error("Unrecognized declaration in table `{table}`: {text}")]
    UnknownConstruct { table: String, text: String },
    #[error("Skipped table statement #{chunk_index}: duplicate table `{table}`")]
    DuplicateTable { chunk_index: usize, table: String },
    #[error("Unrecognized diagram directive: {text}")]
    MalformedDirective { text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub schema: Schema,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The input contains no `CREATE TABLE` statement.
    NoSchema,
    Parsed(ParseResult),
}

impl ParseOutcome {
    pub fn into_result(self) -> Option<ParseResult> {
        match self {
            Self::NoSchema => None,
            Self::Parsed(result) => Some(result),
        }
    }
}

/// Parse DDL text into a schema.
pub fn parse_sql(input: &str, config: &ParseConfig) -> ParseOutcome {
    let cleaned = preprocess(input, &config.directive_prefixes);
    let chunks = split_statements(&cleaned.text);
    if chunks.is_empty() {
        debug!("No CREATE TABLE statements found");
        return ParseOutcome::NoSchema;
    }

    let mut builder = SchemaBuilder::new();
    let mut warnings = Vec::new();

    for (chunk_index, chunk) in chunks.into_iter().enumerate() {
        let body = match tokenize_table(chunk) {
            Ok(body) => body,
            Err(reason) => {
                debug!(chunk_index = chunk_index, reason = reason.to_string(); "Skipping malformed table statement");
                warnings.push(Warning::MalformedStatement {
                    chunk_index,
                    reason,
                });
                continue;
            }
        };

        if builder.has_table(body.name) {
            warnings.push(Warning::DuplicateTable {
                chunk_index,
                table: body.name.to_string(),
            });
            continue;
        }

        let mut table = builder.begin_table(body.name);
        for line in body.declarations {
            apply_declaration(&mut table, line, &mut warnings);
        }
        debug!(table = table.name(), chunk_index = chunk_index; "Parsed table");
        builder.finish_table(table);
    }

    for text in cleaned.directives {
        match parse_directive(&text) {
            Some(directive) => builder.add_manual(directive),
            None => warnings.push(Warning::MalformedDirective { text }),
        }
    }

    debug!(tables = builder.table_count(), warnings = warnings.len(); "Schema built");
    ParseOutcome::Parsed(ParseResult {
        schema: builder.build(),
        warnings,
    })
}

fn apply_declaration(table: &mut TableBuilder, line: &str, warnings: &mut Vec<Warning>) {
    let decl = classify(line);
    trace!(table = table.name(), line = line, decl:? = decl; "Classified declaration");

    match decl {
        Declaration::Column(col) => {
            if col.primary_key {
                table.add_primary_key([col.name.clone()]);
            }
            if let Some(target) = col.references {
                table.add_foreign_key(vec![col.name.clone()], target);
            }
            table.add_column(Column::new(col.name, col.raw_type, col.nullable));
        }
        Declaration::PrimaryKey(columns) => table.add_primary_key(columns),
        Declaration::ForeignKey { columns, target } => table.add_foreign_key(columns, target),
        Declaration::Ignored => {}
        Declaration::Unknown(text) => warnings.push(Warning::UnknownConstruct {
            table: table.name().to_string(),
            text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{KeyAnnotation, MANY_TO_ONE, Origin};

    fn parse(input: &str) -> ParseResult {
        parse_sql(input, &ParseConfig::default())
            .into_result()
            .expect("expected a schema")
    }

    const SCENARIO: &str = r#"
CREATE TABLE Users (
  id INT PRIMARY KEY,
  email VARCHAR(255) NOT NULL
);
CREATE TABLE Orders (
  id INT PRIMARY KEY,
  user_id INT,
  FOREIGN KEY (user_id) REFERENCES Users(id)
);
"#;

    #[test]
    fn test_users_orders_scenario() {
        let result = parse(SCENARIO);
        assert!(result.warnings.is_empty());

        let schema = &result.schema;
        let names: Vec<_> = schema.tables().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Users", "Orders"]);

        let users = schema.table("Users").unwrap();
        let cols: Vec<_> = users
            .columns()
            .iter()
            .map(|c| (c.type_token(), c.name(), users.key_annotation(c)))
            .collect();
        assert_eq!(
            cols,
            vec![
                ("INT", "id", KeyAnnotation::Pk),
                ("VARCHAR_255", "email", KeyAnnotation::None),
            ]
        );
        assert!(!users.column("email").unwrap().nullable());

        let orders = schema.table("Orders").unwrap();
        let user_id = orders.column("user_id").unwrap();
        assert_eq!(orders.key_annotation(user_id), KeyAnnotation::Fk);
        assert_eq!(orders.columns().len(), 2);

        assert_eq!(schema.relationships().len(), 1);
        let rel = &schema.relationships()[0];
        assert_eq!(rel.source, "Orders");
        assert_eq!(rel.target, "Users");
        assert_eq!(rel.cardinality, MANY_TO_ONE);
        assert_eq!(rel.label, "FK: user_id");
        assert_eq!(rel.origin, Origin::Structural);
    }

    #[test]
    fn test_no_schema() {
        let config = ParseConfig::default();
        assert_eq!(parse_sql("", &config), ParseOutcome::NoSchema);
        assert_eq!(parse_sql("SELECT * FROM t;", &config), ParseOutcome::NoSchema);
        assert_eq!(
            parse_sql("-- CREATE TABLE hidden (id INT)\n/* CREATE TABLE x (a INT) */", &config),
            ParseOutcome::NoSchema
        );
    }

    #[test]
    fn test_malformed_chunk_does_not_abort() {
        let result = parse("CREATE TABLE (a INT); CREATE TABLE b (x INT); CREATE TABLE c (y INT");
        assert_eq!(result.schema.tables().len(), 1);
        assert_eq!(result.schema.tables()[0].name(), "b");
        assert_eq!(
            result.warnings,
            vec![
                Warning::MalformedStatement {
                    chunk_index: 0,
                    reason: StatementError::MissingName,
                },
                Warning::MalformedStatement {
                    chunk_index: 2,
                    reason: StatementError::UnbalancedParens,
                },
            ]
        );
    }

    #[test]
    fn test_all_chunks_malformed_is_still_parsed() {
        let result = parse("CREATE TABLE broken");
        assert!(result.schema.tables().is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_constructs_are_reported() {
        let result = parse("CREATE TABLE t (id INT, lonely, FOREIGN KEY (id))");
        assert_eq!(result.schema.tables()[0].columns().len(), 1);
        assert_eq!(
            result.warnings,
            vec![
                Warning::UnknownConstruct {
                    table: "t".into(),
                    text: "lonely".into(),
                },
                Warning::UnknownConstruct {
                    table: "t".into(),
                    text: "FOREIGN KEY (id)".into(),
                },
            ]
        );
    }

    #[test]
    fn test_pk_fk_on_same_column() {
        let result = parse(
            "CREATE TABLE profiles (
                user_id INT,
                PRIMARY KEY (user_id),
                CONSTRAINT fk FOREIGN KEY (user_id) REFERENCES users(id)
            )",
        );
        let table = &result.schema.tables()[0];
        assert_eq!(table.key_annotation(&table.columns()[0]), KeyAnnotation::PkFk);
    }

    #[test]
    fn test_manual_directives_follow_structural() {
        let input = r#"
-- diagram: Users }|--|| Teams : "member of"
CREATE TABLE Users (id INT PRIMARY KEY, team_id INT);
CREATE TABLE Posts (id INT, author INT REFERENCES Users(id));
-- diagram: Users Teams
-- mermaid: Posts }o--o{ Tags : "tagged"
"#;
        let result = parse(input);
        let rels: Vec<_> = result
            .schema
            .relationships()
            .iter()
            .map(|r| (r.source.as_str(), r.cardinality.as_str(), r.target.as_str(), r.label.as_str(), r.origin))
            .collect();
        assert_eq!(
            rels,
            vec![
                ("Posts", MANY_TO_ONE, "Users", "FK: author", Origin::Structural),
                ("Users", "}|--||", "Teams", "member of", Origin::Manual),
                ("Posts", "}o--o{", "Tags", "tagged", Origin::Manual),
            ]
        );
        assert_eq!(
            result.warnings,
            vec![Warning::MalformedDirective {
                text: "Users Teams".into()
            }]
        );
    }

    #[test]
    fn test_custom_directive_prefix() {
        let config = ParseConfig {
            directive_prefixes: vec!["rel".into()],
        };
        let outcome = parse_sql("CREATE TABLE a (id INT);\n-- rel: a ||--|| b\n-- diagram: a ||--|| c", &config);
        let schema = outcome.into_result().unwrap().schema;
        assert_eq!(schema.relationships().len(), 1);
        assert_eq!(schema.relationships()[0].target, "b");
    }

    #[test]
    fn test_duplicate_table() {
        let result = parse("CREATE TABLE a (x INT); CREATE TABLE a (y INT);");
        assert_eq!(result.schema.tables().len(), 1);
        assert_eq!(result.schema.tables()[0].columns()[0].name(), "x");
        assert_eq!(
            result.warnings,
            vec![Warning::DuplicateTable {
                chunk_index: 1,
                table: "a".into()
            }]
        );
    }

    fn columns(table: &crate::ast::Table) -> Vec<(&str, &str)> {
        table.columns().iter().map(|c| (c.name(), c.type_token())).collect()
    }

    #[test]
    fn test_quoted_column_names_with_spaces() {
        let result = parse("CREATE TABLE t (`order id` INT, \"line no\" INT, x INT)");
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(
            columns(&result.schema.tables()[0]),
            vec![("order id", "INT"), ("line no", "INT"), ("x", "INT")]
        );
    }

    #[test]
    fn test_double_quoted_text_is_inert() {
        let result = parse("CREATE TABLE t (note VARCHAR(10) DEFAULT \"a, b\", \"it's\" INT, y INT)");
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(
            columns(&result.schema.tables()[0]),
            vec![("note", "VARCHAR_10"), ("it's", "INT"), ("y", "INT")]
        );
    }

    #[test]
    fn test_create_table_inside_literal() {
        let result = parse(
            "CREATE TABLE t (id INT COMMENT 'copy of CREATE TABLE x', y INT); CREATE TABLE u (z INT);",
        );
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        let names: Vec<_> = result.schema.tables().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["t", "u"]);
        assert_eq!(columns(&result.schema.tables()[0]), vec![("id", "INT"), ("y", "INT")]);
    }

    #[test]
    fn test_mysql_dump() {
        let input = "
/*!40101 SET NAMES utf8 */;
DROP TABLE IF EXISTS `line_items`;
CREATE TABLE `line_items` (
  `id` bigint(20) unsigned NOT NULL AUTO_INCREMENT,
  `order_id` bigint(20) unsigned NOT NULL,
  `price` decimal(10,2) NOT NULL DEFAULT '0.00',
  `note` varchar(64) DEFAULT 'a, b',
  PRIMARY KEY (`id`),
  KEY `idx_order` (`order_id`),
  CONSTRAINT `fk_order` FOREIGN KEY (`order_id`) REFERENCES `orders` (`id`) ON DELETE CASCADE
) ENGINE=InnoDB AUTO_INCREMENT=5 DEFAULT CHARSET=utf8mb4;
";
        let result = parse(input);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        let table = &result.schema.tables()[0];
        assert_eq!(table.name(), "line_items");
        let cols: Vec<_> = table.columns().iter().map(|c| (c.name(), c.type_token())).collect();
        assert_eq!(
            cols,
            vec![
                ("id", "bigint_20"),
                ("order_id", "bigint_20"),
                ("price", "decimal_10_2"),
                ("note", "varchar_64"),
            ]
        );
        assert_eq!(result.schema.relationships()[0].target, "orders");
    }
}
