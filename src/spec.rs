//! The specification object.
//!
//! [`SpecDocument`] accumulates everything the generated document will contain: paths,
//! reusable definitions and responses, security schemes and arbitrary top-level options.
//! [`ApiSpec`] pairs a document with the plugins that populate it.

use crate::plugin::Plugin;
use log::debug;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Accumulating target of the documentation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    openapi_version: String,
    title: String,
    version: String,
    paths: Map<String, Value>,
    security_schemes: Map<String, Value>,
    definitions: Map<String, Value>,
    responses: Map<String, Value>,
    options: Map<String, Value>,
}

impl SpecDocument {
    pub fn new(title: &str, version: &str, openapi_version: &str) -> Self {
        Self {
            openapi_version: openapi_version.to_string(),
            title: title.to_string(),
            version: version.to_string(),
            paths: Map::new(),
            security_schemes: Map::new(),
            definitions: Map::new(),
            responses: Map::new(),
            options: Map::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn openapi_version(&self) -> &str {
        &self.openapi_version
    }

    /// Swagger 2 documents keep registries at the top level, OpenAPI 3 under `components`.
    pub fn is_swagger2(&self) -> bool {
        self.openapi_version.starts_with('2')
    }

    pub fn paths(&self) -> &Map<String, Value> {
        &self.paths
    }

    pub fn definitions(&self) -> &Map<String, Value> {
        &self.definitions
    }

    pub fn responses(&self) -> &Map<String, Value> {
        &self.responses
    }

    pub fn security_schemes(&self) -> &Map<String, Value> {
        &self.security_schemes
    }

    /// Extra top-level fields, deep-merged over the generated document.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.options
    }

    /// The operation registered for `path` and `method` (lowercase), if any.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Map<String, Value>> {
        self.paths.get(path)?.get(method)?.as_object()
    }

    /// The operation for `path` and `method`, created empty on first access.
    pub fn operation_mut(&mut self, path: &str, method: &str) -> &mut Map<String, Value> {
        object_entry(object_entry(&mut self.paths, path), method)
    }

    pub fn security_scheme(&mut self, name: &str, scheme: Value) {
        debug!("Registering security scheme {}", name);
        self.security_schemes.insert(name.to_string(), scheme);
    }

    pub fn definition(&mut self, name: &str, schema: Value) {
        debug!("Registering definition {}", name);
        self.definitions.insert(name.to_string(), schema);
    }

    pub fn response(&mut self, name: &str, response: Value) {
        debug!("Registering response {}", name);
        self.responses.insert(name.to_string(), response);
    }

    /// JSON reference to a registered definition.
    pub fn schema_ref(&self, name: &str) -> String {
        if self.is_swagger2() {
            format!("#/definitions/{}", name)
        } else {
            format!("#/components/schemas/{}", name)
        }
    }

    /// Renders the document. Empty registries are left out.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();

        let mut info = Map::new();
        info.insert("title".to_string(), Value::String(self.title.clone()));
        info.insert("version".to_string(), Value::String(self.version.clone()));
        out.insert("info".to_string(), Value::Object(info));
        out.insert("paths".to_string(), Value::Object(self.paths.clone()));

        if self.is_swagger2() {
            out.insert(
                "swagger".to_string(),
                Value::String(self.openapi_version.clone()),
            );
            insert_non_empty(&mut out, "securityDefinitions", &self.security_schemes);
            insert_non_empty(&mut out, "definitions", &self.definitions);
            insert_non_empty(&mut out, "responses", &self.responses);
        } else {
            out.insert(
                "openapi".to_string(),
                Value::String(self.openapi_version.clone()),
            );
            let mut components = Map::new();
            insert_non_empty(&mut components, "schemas", &self.definitions);
            insert_non_empty(&mut components, "responses", &self.responses);
            insert_non_empty(&mut components, "securitySchemes", &self.security_schemes);
            insert_non_empty(&mut out, "components", &components);
        }

        deep_update(&mut out, &self.options);
        Value::Object(out)
    }
}

fn insert_non_empty(out: &mut Map<String, Value>, key: &str, map: &Map<String, Value>) {
    if !map.is_empty() {
        out.insert(key.to_string(), Value::Object(map.clone()));
    }
}

/// The object stored under `key`, replacing any non-object value.
pub(crate) fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> &'a mut Map<String, Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(object) => object,
        _ => unreachable!("slot was just set to an object"),
    }
}

/// Merges `source` into `target`, recursing into objects present on both sides.
pub(crate) fn deep_update(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(update)) => deep_update(existing, update),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A specification document together with its plugins.
///
/// # Example
///
/// ```
/// use swagger_from_source::spec::ApiSpec;
/// use serde_json::json;
///
/// let spec = ApiSpec::new("Test API", "0.0.1", "2.0");
/// assert_eq!(
///     spec.to_value(),
///     json!({
///         "info": {"title": "Test API", "version": "0.0.1"},
///         "paths": {},
///         "swagger": "2.0",
///     })
/// );
/// ```
#[derive(Clone)]
pub struct ApiSpec {
    document: SpecDocument,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl ApiSpec {
    pub fn new(title: &str, version: &str, openapi_version: &str) -> Self {
        Self {
            document: SpecDocument::new(title, version, openapi_version),
            plugins: Vec::new(),
        }
    }

    /// Deep-merges extra top-level fields (e.g. `info`, `host`) into the output.
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        deep_update(&mut self.document.options, &options);
        self
    }

    /// Registers a plugin and lets it initialize the document right away.
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        debug!("Initializing plugin {}", plugin.name());
        plugin.init_spec(&mut self.document);
        self.plugins.push(plugin);
        self
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Documents operations of `path`, keyed by lowercase method.
    ///
    /// Plugins may rewrite the operations first; each operation's fields are then merged
    /// over the ones already registered for the same method.
    pub fn path(&mut self, path: &str, mut operations: Map<String, Value>) -> &mut Self {
        for plugin in &self.plugins {
            plugin.operation_helper(path, &mut operations);
        }

        for (method, operation) in operations {
            let method = method.to_lowercase();
            match operation {
                Value::Object(fields) => {
                    let existing = self.document.operation_mut(path, &method);
                    for (key, value) in fields {
                        existing.insert(key, value);
                    }
                }
                other => debug!(
                    "Ignoring non-object operation for {} {}: {}",
                    method, path, other
                ),
            }
        }
        self
    }

    pub fn document(&self) -> &SpecDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut SpecDocument {
        &mut self.document
    }

    pub fn to_value(&self) -> Value {
        self.document.to_value()
    }
}

impl std::fmt::Debug for ApiSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSpec")
            .field("document", &self.document)
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_swagger2_layout() {
        let mut document = SpecDocument::new("Test API", "0.0.1", "2.0");
        document.definition("Error400", json!({"type": "object"}));
        document.response("400", json!({"schema": {"$ref": "#/definitions/Error400"}}));
        document.security_scheme("oauth2", json!({"type": "oauth2"}));

        assert_eq!(
            document.to_value(),
            json!({
                "swagger": "2.0",
                "info": {"title": "Test API", "version": "0.0.1"},
                "paths": {},
                "definitions": {"Error400": {"type": "object"}},
                "responses": {"400": {"schema": {"$ref": "#/definitions/Error400"}}},
                "securityDefinitions": {"oauth2": {"type": "oauth2"}},
            })
        );
    }

    #[test]
    fn test_openapi3_layout() {
        let mut document = SpecDocument::new("Test API", "1.0.0", "3.0.2");
        document.definition("Error404", json!({"type": "object"}));

        assert_eq!(document.schema_ref("Error404"), "#/components/schemas/Error404");
        assert_eq!(
            document.to_value(),
            json!({
                "openapi": "3.0.2",
                "info": {"title": "Test API", "version": "1.0.0"},
                "paths": {},
                "components": {"schemas": {"Error404": {"type": "object"}}},
            })
        );
    }

    #[test]
    fn test_registries_are_last_write_wins() {
        let mut document = SpecDocument::new("A", "1", "2.0");
        document.definition("Error400", json!({"type": "string"}));
        document.definition("Error400", json!({"type": "object"}));

        assert_eq!(document.definitions().len(), 1);
        assert_eq!(document.definitions()["Error400"], json!({"type": "object"}));
    }

    #[test]
    fn test_options_deep_merge_into_info() {
        let spec = ApiSpec::new("Test API", "1.0.0", "2.0").with_options(as_map(json!({
            "info": {"x-test": "test field"},
            "host": "example.com",
        })));

        assert_eq!(
            spec.to_value(),
            json!({
                "swagger": "2.0",
                "info": {"title": "Test API", "version": "1.0.0", "x-test": "test field"},
                "host": "example.com",
                "paths": {},
            })
        );
    }

    #[test]
    fn test_operation_access_creates_on_demand() {
        let mut document = SpecDocument::new("A", "1", "2.0");
        assert!(document.operation("/test", "get").is_none());

        document
            .operation_mut("/test", "get")
            .insert("operationId".to_string(), json!("get_test"));

        assert_eq!(
            document.operation("/test", "get"),
            Some(&as_map(json!({"operationId": "get_test"})))
        );
    }

    #[test]
    fn test_object_entry_replaces_scalars() {
        let mut map = as_map(json!({"paths": "oops"}));
        object_entry(&mut map, "paths").insert("x".to_string(), json!(1));
        assert_eq!(Value::Object(map), json!({"paths": {"x": 1}}));
    }

    #[test]
    fn test_path_merges_operations() {
        let mut spec = ApiSpec::new("A", "1", "2.0");
        spec.path(
            "/users",
            as_map(json!({"GET": {"summary": "List", "tags": ["users"]}})),
        );
        spec.path("/users", as_map(json!({"get": {"summary": "List users"}})));

        assert_eq!(
            spec.document().paths()["/users"],
            json!({"get": {"summary": "List users", "tags": ["users"]}})
        );
    }

    struct TaggingPlugin;

    impl Plugin for TaggingPlugin {
        fn name(&self) -> &str {
            "tagging"
        }

        fn init_spec(&self, spec: &mut SpecDocument) {
            spec.options_mut()
                .insert("tags".to_string(), json!([{"name": "default"}]));
        }

        fn operation_helper(&self, _path: &str, operations: &mut Map<String, Value>) {
            for operation in operations.values_mut() {
                if let Value::Object(fields) = operation {
                    fields.insert("tags".to_string(), json!(["default"]));
                }
            }
        }
    }

    #[test]
    fn test_plugins_hook_into_spec() {
        let plugin: Arc<dyn Plugin> = Arc::new(TaggingPlugin);
        let mut spec = ApiSpec::new("A", "1", "2.0").with_plugin(plugin.clone());
        spec.path("/ping", as_map(json!({"get": {}})));

        assert!(spec.plugins().iter().any(|p| Arc::ptr_eq(p, &plugin)));
        assert_eq!(spec.to_value()["tags"], json!([{"name": "default"}]));
        assert_eq!(
            spec.to_value()["paths"]["/ping"]["get"],
            json!({"tags": ["default"]})
        );
    }
}
