//! swagger-from-source - Swagger documents from route tables and handler doc comments.
//!
//! Handlers document themselves: the doc comment holds a short summary, a `---` line and a
//! YAML block with the OpenAPI fields of the operation. This library walks the routes of an
//! application, reads those blocks and assembles a Swagger 2.0 document from them, together
//! with error responses documented on exception handlers.
//!
//! Routes come from a [`source::RouteSource`]:
//!
//! - [`routes::RouteTable`]: an in-memory table the application fills at startup
//! - [`project::SourceProject`]: static analysis of an Axum or Actix-Web code base
//!
//! # Architecture
//!
//! 1. [`docstring`] - Splits handler docs into summary and YAML metadata
//! 2. [`scanner`], [`parser`], [`detector`], [`extractor`] - Find routes in source code
//! 3. [`endpoints`] - Enumerates one endpoint per route and method
//! 4. [`exceptions`] - Turns exception handler docs into error definitions and responses
//! 5. [`spec`], [`plugin`], [`builder`] - The document, its plugins and the operation builder
//! 6. [`helpers`] - Shortcuts for responses and OAuth2 security
//! 7. [`server`] - Serves the document at `/swagger.json` from an axum router
//! 8. [`serializer`], [`config`], [`cli`] - Output, settings and the command line
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use swagger_from_source::{
//!     config::SwaggerConfig,
//!     extractor::HttpMethod,
//!     helpers::document_response,
//!     routes::RouteTable,
//!     server::add_swagger_json_endpoint,
//!     source::HandlerDoc,
//! };
//!
//! # async fn run() {
//! let app = Arc::new(RouteTable::new());
//! app.route(
//!     "/users",
//!     &[HttpMethod::Get],
//!     HandlerDoc::new("list_users").with_doc("Lists users.\n---\ntags: [users]"),
//! );
//!
//! let (router, spec) = add_swagger_json_endpoint(Router::<()>::new(), app, SwaggerConfig::default());
//! document_response(
//!     &mut *spec.write().await,
//!     "/users",
//!     "get",
//!     200,
//!     serde_json::json!({"description": "ok"}),
//! );
//! # let _ = router;
//! # }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod builder;
pub mod cli;
pub mod config;
pub mod detector;
pub mod docstring;
pub mod endpoints;
pub mod error;
pub mod exceptions;
pub mod extractor;
pub mod helpers;
pub mod parser;
pub mod plugin;
pub mod project;
pub mod routes;
pub mod scanner;
pub mod serializer;
pub mod server;
pub mod source;
pub mod spec;
