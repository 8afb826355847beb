//! Handler documentation parsing.
//!
//! Handlers document themselves in their doc comments. The text is split into a human-readable
//! summary and a YAML block holding OpenAPI fields, separated by a line containing only `---`:
//!
//! ```text
//! /// Fetch a single user.
//! /// ---
//! /// responses:
//! ///   200:
//! ///     description: ok
//! ```
//!
//! A doc comment without the delimiter is either pure YAML metadata (when it parses as a
//! mapping) or pure summary text.

use log::debug;
use serde_json::{Map, Number, Value};
use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// Line separating the summary from the YAML block.
pub const DELIMITER: &str = "---";

/// Summary and metadata extracted from a handler's documentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocs {
    /// Text before the delimiter, trimmed. `None` when empty.
    pub summary: Option<String>,
    /// Decoded YAML mapping. Non-string keys (e.g. status codes) are stringified.
    pub metadata: Map<String, Value>,
}

/// Splits documentation text into summary and YAML metadata.
///
/// Never fails: malformed YAML degrades to empty metadata so that one badly documented
/// handler cannot prevent the rest of the document from being generated.
pub fn extract_docs(text: Option<&str>) -> ParsedDocs {
    let Some(text) = text else {
        return ParsedDocs::default();
    };

    let cleaned = dedent(text);
    if cleaned.trim().is_empty() {
        return ParsedDocs::default();
    }

    let lines: Vec<&str> = cleaned.lines().collect();
    if let Some(idx) = lines.iter().position(|line| line.trim() == DELIMITER) {
        let summary = lines[..idx].join("\n").trim().to_string();
        let yaml = lines[idx + 1..].join("\n");
        return ParsedDocs {
            summary: (!summary.is_empty()).then_some(summary),
            metadata: parse_mapping(&yaml).unwrap_or_default(),
        };
    }

    match parse_mapping(&cleaned) {
        Some(metadata) => ParsedDocs {
            summary: None,
            metadata,
        },
        None => ParsedDocs {
            summary: Some(cleaned.trim().to_string()),
            metadata: Map::new(),
        },
    }
}

/// Collects the `#[doc = "..."]` attributes (`///` comments) of an item into one text block.
pub fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(name_value) => match &name_value.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit_str),
                    ..
                }) => Some(lit_str.value()),
                _ => None,
            },
            _ => None,
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Strips the indentation shared by all non-blank lines, plus leading and trailing blank lines.
fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or(""))
        .collect();

    let start = dedented
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(dedented.len());
    let end = dedented
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(start, |idx| idx + 1);

    dedented[start..end].join("\n")
}

fn parse_mapping(yaml: &str) -> Option<Map<String, Value>> {
    if yaml.trim().is_empty() {
        return None;
    }

    match serde_yaml::from_str::<serde_yaml::Value>(yaml) {
        Ok(serde_yaml::Value::Mapping(mapping)) => Some(mapping_to_json(mapping)),
        Ok(_) => None,
        Err(e) => {
            debug!("Ignoring malformed YAML documentation: {}", e);
            None
        }
    }
}

fn mapping_to_json(mapping: serde_yaml::Mapping) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in mapping {
        match key_to_string(&key) {
            Some(key) => {
                map.insert(key, yaml_to_json(value));
            }
            None => debug!("Skipping YAML entry with unsupported key: {:?}", key),
        }
    }
    map
}

fn key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_to_string(&tagged.value),
        _ => None,
    }
}

/// Converts a decoded YAML value into its JSON equivalent.
pub(crate) fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Value::Object(mapping_to_json(mapping)),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}
