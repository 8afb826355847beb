//! Route extraction module for parsing web framework route definitions.
//!
//! This module provides a unified interface for extracting route information from different
//! web frameworks. Each framework has its own extractor implementation that knows how to
//! parse framework-specific route definitions and where the handler functions live, so the
//! handlers' doc comments can be attached to the routes.
//!
//! # Supported Frameworks
//!
//! - **Axum**: See [`axum::AxumExtractor`]
//! - **Actix-Web**: See [`actix::ActixExtractor`]
//!
//! # Example
//!
//! ```no_run
//! use swagger_from_source::extractor::{RouteExtractor, axum::AxumExtractor};
//! use swagger_from_source::parser::AstParser;
//! use std::path::Path;
//!
//! let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
//! let extractor = AxumExtractor;
//! let routes = extractor.extract_routes(&[parsed]);
//! println!("Found {} routes", routes.len());
//! ```

pub mod axum;
pub mod actix;

use crate::error::Error;
use crate::parser::ParsedFile;
use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Trait for extracting route information from parsed Rust files.
///
/// Implementations of this trait know how to analyze the AST of a specific web framework
/// and extract route definitions: paths, HTTP methods, handler names and handler docs.
pub trait RouteExtractor {
    /// Extracts all route information from parsed Rust files.
    ///
    /// # Arguments
    ///
    /// * `parsed_files` - All successfully parsed Rust source files in the project
    ///
    /// # Returns
    ///
    /// Returns a vector of `RouteInfo` structs, one for each discovered route across all files.
    fn extract_routes(&self, parsed_files: &[ParsedFile]) -> Vec<RouteInfo>;

    /// Extracts handlers the application registers for specific error status codes.
    ///
    /// Frameworks without such a registry return nothing.
    fn extract_exception_handlers(&self, _parsed_files: &[ParsedFile]) -> Vec<ExceptionHandlerInfo> {
        Vec::new()
    }
}

/// A single route found in the source code.
#[derive(Debug, Clone)]
pub struct RouteInfo {
    /// The URL path pattern (e.g., "/users/:id" or "/users/{id}")
    pub path: String,
    /// The HTTP method for this route
    pub method: HttpMethod,
    /// The name of the handler function
    pub handler_name: String,
    /// Doc comment of the handler function, if it was found and documented
    pub doc: Option<String>,
}

/// A handler registered for an error status code (e.g. actix-web `ErrorHandlers`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandlerInfo {
    pub status_code: u16,
    pub handler_name: String,
    pub doc: Option<String>,
}

/// HTTP methods supported by route extractors.
///
/// These correspond to standard HTTP methods used in RESTful APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Uppercase verb, e.g. `GET`
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Lowercase verb, the key used inside an OpenAPI path item
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }

    /// Parses a method name in any case, `None` for anything that is not an HTTP verb
    pub fn parse(method: &str) -> Option<HttpMethod> {
        match method.to_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::parse(s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown HTTP method: {}", s)))
    }
}

impl RouteInfo {
    /// Create a new RouteInfo without documentation
    pub fn new(path: String, method: HttpMethod, handler_name: String) -> Self {
        Self {
            path,
            method,
            handler_name,
            doc: None,
        }
    }
}

/// Combine a prefix and path, handling slashes correctly
/// Remembers the doc comment of handler `name`.
///
/// Handlers are looked up by bare name, so a documented function is never replaced by an
/// undocumented one of the same name. Two differently documented ones keep the last seen.
pub(crate) fn record_handler_doc(
    functions: &mut HashMap<String, Option<String>>,
    name: String,
    doc: Option<String>,
) {
    match (functions.get(&name), &doc) {
        (Some(Some(_)), None) => return,
        (Some(Some(existing)), Some(new)) if existing != new => {
            warn!(
                "Handler name {} is defined more than once with different docs, using the last one",
                name
            );
        }
        _ => {}
    }
    functions.insert(name, doc);
}

pub(crate) fn combine_paths(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }

    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

/// Extract a string literal from an expression
pub(crate) fn extract_string_literal(expr: &syn::Expr) -> Option<String> {
    match expr {
        syn::Expr::Lit(expr_lit) => {
            if let syn::Lit::Str(lit_str) = &expr_lit.lit {
                Some(lit_str.value())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Extract handler name from any expression (`handler`, `handlers::users::get`, `Self::get`)
pub(crate) fn extract_handler_name(expr: &syn::Expr) -> String {
    match expr {
        syn::Expr::Path(path_expr) => path_expr
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        _ => "unknown".to_string(),
    }
}
