//! Route source abstraction.
//!
//! Documentation is generated from anything that can list its routes and exception handlers:
//! a live in-memory table ([`crate::routes::RouteTable`]) or a statically analyzed project
//! ([`crate::project::SourceProject`]).

use crate::extractor::HttpMethod;

/// A handler's identifier and its documentation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDoc {
    pub name: String,
    pub doc: Option<String>,
}

impl HandlerDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// One entry of a host routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    /// Methods the route answers, including implicit ones
    pub methods: Vec<HttpMethod>,
    /// Methods the host added on its own (HEAD next to GET); never documented
    pub implicit_methods: Vec<HttpMethod>,
    pub handler: HandlerDoc,
    pub include_in_schema: bool,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, methods: Vec<HttpMethod>, handler: HandlerDoc) -> Self {
        Self {
            path: path.into(),
            methods,
            implicit_methods: Vec::new(),
            handler,
            include_in_schema: true,
        }
    }

    /// Keeps the route out of the generated document.
    pub fn hidden(mut self) -> Self {
        self.include_in_schema = false;
        self
    }
}

/// What an exception handler is registered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    /// An HTTP status code
    Status(u16),
    /// An error type, by name
    Exception(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandlerEntry {
    pub key: HandlerKey,
    pub handler: HandlerDoc,
}

/// Something that can enumerate its routes.
pub trait RouteSource: Send + Sync {
    fn routes(&self) -> Vec<RouteEntry>;
}

/// Something that can enumerate its exception handlers.
pub trait ExceptionHandlerSource: Send + Sync {
    fn exception_handlers(&self) -> Vec<ExceptionHandlerEntry>;
}
