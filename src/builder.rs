//! Assembly of an immutable [`Schema`] from classified declarations.

use indexmap::IndexSet;

use crate::ast::{Column, MANY_TO_ONE, Origin, Relationship, Schema, Table};
use crate::directive::Directive;

/// Collects tables and relationships for one parse call.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: Vec<Table>,
    structural: Vec<Relationship>,
    manual: Vec<Relationship>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    pub fn begin_table(&self, name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            table: Table {
                name: name.into(),
                columns: Vec::new(),
                primary_key: IndexSet::new(),
                foreign_keys: IndexSet::new(),
            },
            relationships: Vec::new(),
        }
    }

    /// Add a finished table along with the relationships it declared.
    pub fn finish_table(&mut self, table: TableBuilder) {
        self.structural.extend(table.relationships);
        self.tables.push(table.table);
    }

    pub fn add_manual(&mut self, directive: Directive) {
        self.manual.push(Relationship {
            source: directive.source,
            target: directive.target,
            cardinality: directive.cardinality,
            label: directive.label,
            origin: Origin::Manual,
        });
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn build(self) -> Schema {
        let mut relationships = self.structural;
        relationships.extend(self.manual);
        Schema::new(self.tables, relationships)
    }
}

/// One table under construction.
#[derive(Debug)]
pub struct TableBuilder {
    table: Table,
    relationships: Vec<Relationship>,
}

impl TableBuilder {
    pub fn name(&self) -> &str {
        &self.table.name
    }

    pub fn add_column(&mut self, column: Column) {
        self.table.columns.push(column);
    }

    pub fn add_primary_key<I: IntoIterator<Item = String>>(&mut self, columns: I) {
        self.table.primary_key.extend(columns);
    }

    /// Record FK columns and the structural relationship they imply.
    pub fn add_foreign_key(&mut self, columns: Vec<String>, target: impl Into<String>) {
        let label = format!("FK: {}", columns.join(", "));
        self.table.foreign_keys.extend(columns);
        self.relationships.push(Relationship {
            source: self.table.name.clone(),
            target: target.into(),
            cardinality: MANY_TO_ONE.to_string(),
            label,
            origin: Origin::Structural,
        });
    }
}
