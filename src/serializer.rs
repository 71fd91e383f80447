//! Serializer for converting a [`Schema`] to Mermaid `erDiagram` text.

use log::debug;

use crate::ast::{Column, KeyAnnotation, Relationship, Schema, Table};

const HEADER: &str = "erDiagram";

/// Emit a schema as a Mermaid ER diagram.
///
/// The output only depends on the schema, so equal schemas give
/// byte-identical text.
pub fn emit(schema: &Schema) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for table in schema.tables() {
        emit_table(&mut output, table);
    }

    for rel in schema.relationships() {
        emit_relationship(&mut output, rel);
    }

    debug!(
        tables = schema.tables().len(),
        relationships = schema.relationships().len(),
        bytes = output.len();
        "Emitted diagram"
    );
    output
}

fn emit_table(output: &mut String, table: &Table) {
    output.push_str(&format!("  {} {{\n", table.name()));
    for column in table.columns() {
        emit_column(output, column, table.key_annotation(column));
    }
    output.push_str("  }\n");
}

fn emit_column(output: &mut String, column: &Column, key: KeyAnnotation) {
    let typ = match column.type_token() {
        "" => "UNKNOWN",
        token => token,
    };
    output.push_str(&format!("    {} {}", typ, column.name()));
    if key != KeyAnnotation::None {
        output.push(' ');
        output.push_str(key.as_str());
    }
    output.push('\n');
}

fn emit_relationship(output: &mut String, rel: &Relationship) {
    output.push_str(&format!(
        "  {} {} {} : \"{}\"\n",
        rel.source,
        rel.cardinality,
        rel.target,
        escape_label(&rel.label)
    ));
}

/// Mermaid labels cannot contain a bare `"`; use its entity code instead.
fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}
