use indexmap::IndexSet;

/// Mermaid token for "many source rows reference at most one target row".
pub const MANY_TO_ONE: &str = "}o--||";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    tables: Vec<Table>,
    relationships: Vec<Relationship>,
}

impl Schema {
    pub(crate) fn new(tables: Vec<Table>, relationships: Vec<Relationship>) -> Self {
        Self {
            tables,
            relationships,
        }
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Structural relationships first, then manual ones.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub(crate) name: String,
    pub(crate) columns: Vec<Column>,
    pub(crate) primary_key: IndexSet<String>,
    pub(crate) foreign_keys: IndexSet<String>,
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> &IndexSet<String> {
        &self.primary_key
    }

    pub fn foreign_keys(&self) -> &IndexSet<String> {
        &self.foreign_keys
    }

    pub fn key_annotation(&self, column: &Column) -> KeyAnnotation {
        let pk = self.primary_key.contains(&column.name);
        let fk = self.foreign_keys.contains(&column.name);
        match (pk, fk) {
            (true, true) => KeyAnnotation::PkFk,
            (true, false) => KeyAnnotation::Pk,
            (false, true) => KeyAnnotation::Fk,
            (false, false) => KeyAnnotation::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) raw_type: String,
    pub(crate) type_token: String,
    pub(crate) nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>, nullable: bool) -> Self {
        let raw_type = raw_type.into();
        Self {
            name: name.into(),
            type_token: normalize_type(&raw_type),
            raw_type,
            nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type exactly as declared, e.g. `DECIMAL(10,2)`.
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    /// Display-safe type, e.g. `DECIMAL_10_2`.
    pub fn type_token(&self) -> &str {
        &self.type_token
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAnnotation {
    None,
    Pk,
    Fk,
    PkFk,
}

impl KeyAnnotation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Pk => "PK",
            Self::Fk => "FK",
            Self::PkFk => "PK,FK",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub cardinality: String,
    pub label: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Inferred from a `FOREIGN KEY` clause or inline `REFERENCES`.
    Structural,
    /// Declared by a `-- diagram:` directive.
    Manual,
}

/// Collapse everything but ASCII alphanumerics into single underscores.
///
/// `VARCHAR(255)` becomes `VARCHAR_255` and `DECIMAL(10,2)` becomes `DECIMAL_10_2`.
pub fn normalize_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    if out.ends_with('_') {
        out.pop();
    }
    out
}
