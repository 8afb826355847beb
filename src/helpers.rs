//! Shortcuts for common annotations.
//!
//! Each helper mutates the spec in place and can be called repeatedly with the same
//! arguments without changing the result. Methods are lowercased, missing path and
//! operation objects are created.

use crate::spec::ApiSpec;
use serde_json::{json, Map, Value};

pub const DEFAULT_UNAUTHORIZED_STATUS_CODE: u16 = 401;
pub const DEFAULT_FORBIDDEN_STATUS_CODE: u16 = 403;

const OAUTH2_SCHEME: &str = "oauth2";
const UNAUTHORIZED_DESCRIPTION: &str = "No permission -- see authorization schemes";
const FORBIDDEN_DESCRIPTION: &str = "Request forbidden -- authorization will not help";

/// Documents `response` as the `status_code` response of `method` on `endpoint`.
pub fn document_response(
    spec: &mut ApiSpec,
    endpoint: &str,
    method: &str,
    status_code: u16,
    response: Value,
) {
    let operation = spec
        .document_mut()
        .operation_mut(endpoint, &method.to_lowercase());
    responses(operation).insert(status_code.to_string(), response);
}

/// Registers the `oauth2` security scheme.
///
/// ```
/// use swagger_from_source::helpers::document_oauth2_authentication;
/// use swagger_from_source::spec::ApiSpec;
///
/// let mut spec = ApiSpec::new("Test API", "0.0.1", "2.0");
/// document_oauth2_authentication(
///     &mut spec,
///     "http://test",
///     "implicit",
///     [("scope1", "Description of scope1")],
/// );
/// assert_eq!(spec.to_value()["securityDefinitions"]["oauth2"]["flow"], "implicit");
/// ```
pub fn document_oauth2_authentication<I, K, V>(
    spec: &mut ApiSpec,
    authorization_url: &str,
    flow: &str,
    scopes: I,
) where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let scopes: Map<String, Value> = scopes
        .into_iter()
        .map(|(name, description)| (name.into(), Value::String(description.into())))
        .collect();

    spec.document_mut().security_scheme(
        OAUTH2_SCHEME,
        json!({
            "type": "oauth2",
            "authorizationUrl": authorization_url,
            "flow": flow,
            "scopes": scopes,
        }),
    );
}

/// Requires the `oauth2` scheme with `required_scopes` on `method` of `endpoint` and
/// documents the responses returned when authentication is missing or insufficient.
pub fn document_endpoint_oauth2_authentication(
    spec: &mut ApiSpec,
    endpoint: &str,
    method: &str,
    required_scopes: &[&str],
    unauthorized_status_code: u16,
    forbidden_status_code: u16,
) {
    let operation = spec
        .document_mut()
        .operation_mut(endpoint, &method.to_lowercase());

    operation.insert(
        "security".to_string(),
        json!([{ OAUTH2_SCHEME: required_scopes }]),
    );

    let responses = responses(operation);
    responses.insert(
        unauthorized_status_code.to_string(),
        json!({"description": UNAUTHORIZED_DESCRIPTION, "schema": {"type": "string"}}),
    );
    responses.insert(
        forbidden_status_code.to_string(),
        json!({"description": FORBIDDEN_DESCRIPTION, "schema": {"type": "string"}}),
    );
}

fn responses(operation: &mut Map<String, Value>) -> &mut Map<String, Value> {
    crate::spec::object_entry(operation, "responses")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec() -> ApiSpec {
        ApiSpec::new("Test API", "0.0.1", "2.0")
    }

    #[test]
    fn test_response_documentation() {
        let mut spec = spec();
        document_response(&mut spec, "/test", "GET", 200, json!({"description": "ok"}));

        assert_eq!(
            spec.to_value(),
            json!({
                "info": {"title": "Test API", "version": "0.0.1"},
                "paths": {"/test": {"get": {"responses": {"200": {"description": "ok"}}}}},
                "swagger": "2.0",
            })
        );
    }

    #[test]
    fn test_response_documentation_keeps_other_codes() {
        let mut spec = spec();
        document_response(&mut spec, "/test", "get", 200, json!({"description": "ok"}));
        document_response(&mut spec, "/test", "get", 404, json!({"description": "missing"}));
        document_response(&mut spec, "/test", "get", 404, json!({"description": "missing"}));

        assert_eq!(
            spec.to_value()["paths"]["/test"]["get"]["responses"],
            json!({"200": {"description": "ok"}, "404": {"description": "missing"}})
        );
    }

    #[test]
    fn test_oauth2_authentication_documentation() {
        let mut spec = spec();
        document_oauth2_authentication(
            &mut spec,
            "http://test",
            "implicit",
            [
                ("scope1", "Description of scope1"),
                ("scope2", "Description of scope2"),
            ],
        );

        assert_eq!(
            spec.to_value(),
            json!({
                "info": {"title": "Test API", "version": "0.0.1"},
                "paths": {},
                "securityDefinitions": {
                    "oauth2": {
                        "authorizationUrl": "http://test",
                        "flow": "implicit",
                        "scopes": {
                            "scope1": "Description of scope1",
                            "scope2": "Description of scope2",
                        },
                        "type": "oauth2",
                    }
                },
                "swagger": "2.0",
            })
        );
    }

    #[test]
    fn test_endpoint_oauth2_authentication_documentation() {
        let mut spec = spec();
        document_endpoint_oauth2_authentication(
            &mut spec,
            "/test",
            "get",
            &["scope1", "scope2"],
            DEFAULT_UNAUTHORIZED_STATUS_CODE,
            DEFAULT_FORBIDDEN_STATUS_CODE,
        );

        assert_eq!(
            spec.to_value(),
            json!({
                "info": {"title": "Test API", "version": "0.0.1"},
                "paths": {
                    "/test": {
                        "get": {
                            "responses": {
                                "401": {
                                    "description": "No permission -- see authorization schemes",
                                    "schema": {"type": "string"},
                                },
                                "403": {
                                    "description": "Request forbidden -- authorization will not help",
                                    "schema": {"type": "string"},
                                },
                            },
                            "security": [{"oauth2": ["scope1", "scope2"]}],
                        }
                    }
                },
                "swagger": "2.0",
            })
        );
    }

    #[test]
    fn test_endpoint_oauth2_custom_codes_are_idempotent() {
        let mut spec = spec();
        for _ in 0..2 {
            document_endpoint_oauth2_authentication(&mut spec, "/test", "GET", &["scope1"], 400, 402);
        }

        let value = spec.to_value();
        let operation = &value["paths"]["/test"]["get"];
        assert_eq!(operation["security"], json!([{"oauth2": ["scope1"]}]));
        let codes: Vec<&String> = operation["responses"].as_object().unwrap().keys().collect();
        assert_eq!(codes, vec!["400", "402"]);
    }
}
