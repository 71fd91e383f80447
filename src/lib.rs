pub mod ast;
pub mod builder;
pub mod config;
pub mod directive;
pub mod format;
pub mod scan;
pub mod serializer;
pub mod sql;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

use wasm_bindgen::prelude::*;

use config::ParseConfig;

pub use directive::directive_line;
pub use format::{format, format_with};
pub use serializer::emit;
pub use sql::{ParseOutcome, ParseResult, Warning, parse_sql};

/// Parse DDL with the default configuration.
pub fn parse(input: &str) -> ParseOutcome {
    parse_sql(input, &ParseConfig::default())
}

/// Names of the tables the parser accepts, in source order.
pub fn table_names(input: &str) -> Vec<String> {
    match parse(input) {
        ParseOutcome::NoSchema => Vec::new(),
        ParseOutcome::Parsed(result) => result
            .schema
            .tables()
            .iter()
            .map(|t| t.name().to_string())
            .collect(),
    }
}

const NO_SCHEMA: &str = "no CREATE TABLE statements found";

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// A rendered diagram plus the warnings collected on the way.
#[wasm_bindgen]
pub struct Rendered {
    diagram: String,
    warnings: Vec<String>,
}

#[wasm_bindgen]
impl Rendered {
    #[wasm_bindgen(getter)]
    pub fn diagram(&self) -> String {
        self.diagram.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn warnings(&self) -> js_sys::Array {
        self.warnings.iter().map(|w| JsValue::from_str(w)).collect()
    }
}

fn render(source: &str) -> Result<Rendered, String> {
    let result = parse(source).into_result().ok_or(NO_SCHEMA)?;
    Ok(Rendered {
        diagram: emit(&result.schema),
        warnings: result.warnings.iter().map(ToString::to_string).collect(),
    })
}

/// Render DDL source to Mermaid `erDiagram` text
#[wasm_bindgen(js_name = "ddlToMermaid")]
pub fn ddl_to_mermaid(source: &str) -> Result<Rendered, String> {
    render(source)
}

#[wasm_bindgen(js_name = "formatSql")]
pub fn format_sql(source: &str) -> String {
    format(source)
}

#[wasm_bindgen(js_name = "tableNames")]
pub fn table_names_js(source: &str) -> js_sys::Array {
    table_names(source)
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect()
}

/// Build a `-- diagram:` line an editor can insert to add a relationship.
#[wasm_bindgen(js_name = "relationshipDirective")]
pub fn relationship_directive(source: &str, token: &str, target: &str, label: &str) -> String {
    directive_line(source, token, target, label)
}
