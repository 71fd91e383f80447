//! Manual relationship directives: `-- diagram: Users }|--|| Teams : "member of"`.

/// A parsed directive, with every part taken verbatim from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub source: String,
    pub cardinality: String,
    pub target: String,
    pub label: String,
}

/// Parse a directive body (the text after `diagram:`).
///
/// The part before the first `:` must be exactly `<Source> <token> <Target>`.
/// The label after it loses one pair of surrounding double quotes and is
/// otherwise kept as written. A directive without `:` has an empty label.
pub fn parse_directive(body: &str) -> Option<Directive> {
    let (head, label) = match body.split_once(':') {
        Some((head, label)) => (head, unquote_label(label.trim())),
        None => (body, ""),
    };

    let mut parts = head.split_whitespace();
    let (Some(source), Some(cardinality), Some(target), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    Some(Directive {
        source: source.to_string(),
        cardinality: cardinality.to_string(),
        target: target.to_string(),
        label: label.to_string(),
    })
}

fn unquote_label(label: &str) -> &str {
    label
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(label)
}

/// Build the comment line that declares a manual relationship.
pub fn directive_line(source: &str, cardinality: &str, target: &str, label: &str) -> String {
    format!("-- diagram: {source} {cardinality} {target} : \"{}\"", label.trim())
}
