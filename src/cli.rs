//! Command-line interface for `sqlerd`.
//!
//! Arguments are parsed with [`clap`]. Every subcommand reads DDL from a file
//! or stdin and writes to a file or stdout.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use log::{info, warn};
use thiserror::Error;

use crate::config::{AppConfig, ConfigError, load_config};
use crate::sql::{ParseOutcome, parse_sql};
use crate::{emit, format_with};

/// SQL DDL to Mermaid ER diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Emit a Mermaid erDiagram for the tables in INPUT
    Render {
        /// Input DDL file; stdin when omitted
        input: Option<PathBuf>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-indent the DDL in INPUT
    Format {
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the table names found in INPUT
    Tables { input: Option<PathBuf> },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no CREATE TABLE statements found")]
    NoSchema,
}

/// Run one CLI invocation.
///
/// # Errors
///
/// Returns `CliError` for I/O failures, an unreadable configuration file, or
/// input without any `CREATE TABLE` statement.
pub fn run(args: &Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Render { input, output } => {
            let source = read_input(input.as_deref())?;
            let diagram = render(&source, &config)?;
            write_output(output.as_deref(), &diagram)?;
        }
        Command::Format { input, output } => {
            let source = read_input(input.as_deref())?;
            let mut formatted = format_with(&source, &config.format);
            formatted.push('\n');
            write_output(output.as_deref(), &formatted)?;
        }
        Command::Tables { input } => {
            let source = read_input(input.as_deref())?;
            let mut listing = String::new();
            for name in table_names(&source, &config)? {
                listing.push_str(&name);
                listing.push('\n');
            }
            write_output(None, &listing)?;
        }
    }

    Ok(())
}

fn render(source: &str, config: &AppConfig) -> Result<String, CliError> {
    let result = match parse_sql(source, &config.parse) {
        ParseOutcome::NoSchema => return Err(CliError::NoSchema),
        ParseOutcome::Parsed(result) => result,
    };
    for warning in &result.warnings {
        warn!("{warning}");
    }
    Ok(emit(&result.schema))
}

fn table_names(source: &str, config: &AppConfig) -> Result<Vec<String>, CliError> {
    match parse_sql(source, &config.parse) {
        ParseOutcome::NoSchema => Err(CliError::NoSchema),
        ParseOutcome::Parsed(result) => Ok(result
            .schema
            .tables()
            .iter()
            .map(|t| t.name().to_string())
            .collect()),
    }
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => {
            info!(input_path = path.display().to_string(); "Reading input");
            fs::read_to_string(path)
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> io::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text)?;
            info!(output_file = path.display().to_string(); "Output written");
            Ok(())
        }
        None => io::stdout().write_all(text.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_args_defaults() {
        let parsed = args(&["sqlerd", "render"]);
        assert_eq!(parsed.log_level, "warn");
        assert!(parsed.config.is_none());
        assert!(matches!(
            parsed.command,
            Command::Render {
                input: None,
                output: None
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let parsed = args(&["sqlerd", "format", "in.sql", "-o", "out.sql", "--log-level", "debug"]);
        assert_eq!(parsed.log_level, "debug");
        let Command::Format { input, output } = parsed.command else {
            panic!("expected format");
        };
        assert_eq!(input, Some(PathBuf::from("in.sql")));
        assert_eq!(output, Some(PathBuf::from("out.sql")));
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("schema.sql");
        let output = dir.path().join("schema.mmd");
        fs::write(&input, "CREATE TABLE a (id INT PRIMARY KEY);").unwrap();
        let config = dir.path().join("sqlerd.toml");
        fs::write(&config, "").unwrap();

        let parsed = args(&[
            "sqlerd",
            "render",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);
        run(&parsed).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "erDiagram\n  a {\n    INT id PK\n  }\n"
        );
    }

    #[test]
    fn test_render_without_tables_fails() {
        let err = render("DROP TABLE a;", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::NoSchema));
    }

    #[test]
    fn test_format_uses_configured_indent() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("schema.sql");
        let output = dir.path().join("pretty.sql");
        let config = dir.path().join("custom.toml");
        fs::write(&input, "CREATE TABLE a (id INT, b INT);").unwrap();
        fs::write(&config, "[format]\nindent = 2\n").unwrap();

        let parsed = args(&[
            "sqlerd",
            "--config",
            config.to_str().unwrap(),
            "format",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        run(&parsed).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "CREATE TABLE a (\n  id INT,\n  b INT\n);\n"
        );
    }

    #[test]
    fn test_missing_config_file() {
        let parsed = args(&["sqlerd", "--config", "/nonexistent/sqlerd.toml", "tables"]);
        assert!(matches!(run(&parsed), Err(CliError::Config(_))));
    }
}
