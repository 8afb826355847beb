use crate::docstring::extract_docs;
use crate::endpoints::{enumerate_endpoints, EndpointDescriptor};
use crate::source::RouteSource;
use crate::spec::{ApiSpec, SpecDocument};
use log::debug;
use serde_json::{Map, Value};

/// Builds the operation object documenting `endpoint`.
///
/// The handler's YAML metadata is the base, with its summary added unless the YAML sets one.
/// Fields of an operation already registered in `document` for the same path and method
/// override extracted ones. `operationId` is filled in when nothing provided it.
pub fn build_operation(document: &SpecDocument, endpoint: &EndpointDescriptor) -> Map<String, Value> {
    let docs = extract_docs(endpoint.handler().doc.as_deref());

    let mut operation = docs.metadata;
    if let Some(summary) = docs.summary {
        operation
            .entry("summary")
            .or_insert(Value::String(summary));
    }

    if let Some(explicit) = document.operation(endpoint.path(), endpoint.method().as_lower()) {
        for (key, value) in explicit {
            operation.insert(key.clone(), value.clone());
        }
    }

    operation
        .entry("operationId")
        .or_insert_with(|| Value::String(endpoint.operation_id()));
    operation
}

/// Documents every endpoint of `source` in `spec`; returns how many were written.
///
/// Each operation goes through [`ApiSpec::path`], so every plugin of `spec` sees it.
pub fn build_paths(spec: &mut ApiSpec, source: &dyn RouteSource) -> usize {
    let mut count = 0;
    for endpoint in enumerate_endpoints(source) {
        debug!("Documenting {} {}", endpoint.method(), endpoint.path());
        let operation = build_operation(spec.document(), &endpoint);

        let mut operations = Map::new();
        operations.insert(
            endpoint.method().as_lower().to_string(),
            Value::Object(operation),
        );
        spec.path(endpoint.path(), operations);
        count += 1;
    }
    count
}
