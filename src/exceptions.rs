use crate::docstring::extract_docs;
use crate::source::{ExceptionHandlerSource, HandlerKey};
use crate::spec::SpecDocument;
use log::debug;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Decides which status code a documented exception handler is registered under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePrecedence {
    /// The status code the handler is registered for wins; a nested `400:` block matching
    /// it is used as the schema.
    #[default]
    TableKey,
    /// Status codes declared at the top of the handler's YAML win, the table key is the
    /// fallback when none are declared.
    Declared,
}

/// Registers an `Error{code}` definition and a `"{code}"` response for every documented
/// exception handler of `source`. Returns the number of codes registered.
///
/// Handlers keyed by an error type only contribute the codes their YAML declares.
pub fn collect_exception_docs(
    document: &mut SpecDocument,
    source: &dyn ExceptionHandlerSource,
    precedence: CodePrecedence,
) -> usize {
    let mut registered = 0;

    for entry in source.exception_handlers() {
        let docs = extract_docs(entry.handler.doc.as_deref());
        if docs.metadata.is_empty() {
            debug!("Exception handler {} has no YAML docs", entry.handler.name);
            continue;
        }

        let declared = declared_codes(&docs.metadata);
        match entry.key {
            HandlerKey::Status(code) => {
                if precedence == CodePrecedence::Declared && !declared.is_empty() {
                    for (code, schema) in declared {
                        register(document, code, schema);
                        registered += 1;
                    }
                } else {
                    let nested = match docs.metadata.get(&code.to_string()) {
                        Some(Value::Object(nested)) => Some(nested.clone()),
                        _ => None,
                    };
                    let schema = nested.unwrap_or(docs.metadata);
                    register(document, code, schema);
                    registered += 1;
                }
            }
            HandlerKey::Exception(name) => {
                if declared.is_empty() {
                    debug!(
                        "Skipping handler {} for {}: no status code",
                        entry.handler.name, name
                    );
                }
                for (code, schema) in declared {
                    register(document, code, schema);
                    registered += 1;
                }
            }
        }
    }

    registered
}

/// Top-level YAML keys that are HTTP status codes with a mapping as value.
fn declared_codes(metadata: &Map<String, Value>) -> Vec<(u16, Map<String, Value>)> {
    metadata
        .iter()
        .filter_map(|(key, value)| {
            let code = key.parse::<u16>().ok().filter(|c| (100..=599).contains(c))?;
            match value {
                Value::Object(schema) => Some((code, schema.clone())),
                _ => None,
            }
        })
        .collect()
}

fn register(document: &mut SpecDocument, code: u16, schema: Map<String, Value>) {
    let name = format!("Error{}", code);
    let reference = document.schema_ref(&name);
    document.definition(&name, Value::Object(schema));
    document.response(&code.to_string(), json!({"schema": {"$ref": reference}}));
}
