use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use swagger_from_source::{
    config::SwaggerConfig,
    detector::Framework,
    plugin::RoutesPlugin,
    project::SourceProject,
    serializer::{serialize_json, serialize_yaml},
    spec::ApiSpec,
};
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

/// Analyze a project and build its document the way the command line does
fn generate(project: SourceProject, config: SwaggerConfig) -> ApiSpec {
    let routes = Arc::new(
        RoutesPlugin::new(Arc::new(project)).code_precedence(config.code_precedence),
    );
    let mut spec = config.to_spec().with_plugin(routes.clone());
    routes.build_paths(&mut spec);
    spec
}

#[test]
fn test_axum_end_to_end_generation() {
    let temp_dir = create_test_project(vec![(
        "src/main.rs",
        include_str!("fixtures/axum_project.rs"),
    )]);

    let project = SourceProject::load(temp_dir.path(), None).expect("Failed to load project");
    assert_eq!(project.frameworks(), &[Framework::Axum]);

    let spec = generate(project, SwaggerConfig::default());

    assert_eq!(
        spec.to_value(),
        json!({
            "swagger": "2.0",
            "info": {"title": "My API", "version": "0.0.1"},
            "paths": {
                "/health": {"get": {"operationId": "get_health_check"}},
                "/api/v1/users": {
                    "get": {
                        "operationId": "get_get_users",
                        "summary": "List users.",
                        "parameters": [{"name": "page", "in": "query", "type": "integer"}],
                        "responses": {"200": {"description": "A page of users"}},
                    },
                    "post": {"operationId": "post_create_user", "summary": "Create a user."},
                },
                "/api/v1/users/{id}": {
                    "get": {
                        "operationId": "get_get_user",
                        "responses": {
                            "200": {"description": "The user"},
                            "404": {"description": "No such user"},
                        },
                    },
                    "delete": {"operationId": "delete_delete_user"},
                },
                "/auth/login": {"post": {"operationId": "post_login"}},
            },
        })
    );
}

#[test]
fn test_actix_end_to_end_generation() {
    let temp_dir = create_test_project(vec![(
        "src/main.rs",
        include_str!("fixtures/actix_project.rs"),
    )]);

    let project = SourceProject::load(temp_dir.path(), None).expect("Failed to load project");
    assert_eq!(project.frameworks(), &[Framework::ActixWeb]);

    let spec = generate(project, SwaggerConfig::default());

    assert_eq!(
        spec.to_value(),
        json!({
            "swagger": "2.0",
            "info": {"title": "My API", "version": "0.0.1"},
            "paths": {
                "/api/v1/users": {
                    "get": {
                        "operationId": "get_get_users",
                        "summary": "List users.",
                        "responses": {"200": {"description": "All users"}},
                    },
                },
                "/api/v1/users/{id}": {
                    "get": {
                        "operationId": "get_get_user",
                        "responses": {"200": {"description": "The user"}},
                    },
                    "delete": {"operationId": "delete_delete_user"},
                },
                "/api/v1/version": {
                    "get": {"operationId": "get_version", "summary": "Current server version."},
                },
                "/health": {
                    "get": {"operationId": "get_health_check", "summary": "Liveness probe."},
                },
            },
            "definitions": {
                "Error400": {
                    "required": ["message"],
                    "properties": {"message": {"type": "string"}},
                    "type": "object",
                },
                "Error500": {
                    "type": "object",
                    "properties": {"trace_id": {"type": "string"}},
                },
            },
            "responses": {
                "400": {"schema": {"$ref": "#/definitions/Error400"}},
                "500": {"schema": {"$ref": "#/definitions/Error500"}},
            },
        })
    );
}

#[test]
fn test_explicit_framework_skips_other_extractor() {
    let temp_dir = create_test_project(vec![
        ("src/api.rs", include_str!("fixtures/axum_project.rs")),
        ("src/legacy.rs", include_str!("fixtures/actix_project.rs")),
    ]);

    let detected = SourceProject::load(temp_dir.path(), None).unwrap();
    assert_eq!(detected.frameworks(), &[Framework::Axum, Framework::ActixWeb]);

    let project = SourceProject::load(temp_dir.path(), Some(Framework::ActixWeb)).unwrap();
    let spec = generate(project, SwaggerConfig::default());

    let value = spec.to_value();
    let paths = value["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/v1/version"));
    assert!(!paths.contains_key("/auth/login"));
}

#[test]
fn test_project_without_framework_fails() {
    let temp_dir = create_test_project(vec![("src/lib.rs", "pub fn add(a: i32, b: i32) -> i32 { a + b }")]);

    let err = SourceProject::load(temp_dir.path(), None).unwrap_err();
    assert!(err.to_string().contains("No supported web framework detected"));
}

#[test]
fn test_serialized_outputs_agree() {
    let temp_dir = create_test_project(vec![(
        "src/main.rs",
        include_str!("fixtures/axum_project.rs"),
    )]);
    let project = SourceProject::load(temp_dir.path(), None).unwrap();

    let config = SwaggerConfig {
        title: "Users API".to_string(),
        version: "2.1.0".to_string(),
        ..SwaggerConfig::default()
    };
    let spec = generate(project, config);

    let from_yaml: Value = serde_yaml::from_str(&serialize_yaml(&spec).unwrap()).unwrap();
    let from_json: Value = serde_json::from_str(&serialize_json(&spec).unwrap()).unwrap();

    assert_eq!(from_yaml, from_json);
    assert_eq!(from_json["info"], json!({"title": "Users API", "version": "2.1.0"}));
}
