use crate::builder;
use crate::endpoints::{enumerate_endpoints, EndpointDescriptor};
use crate::exceptions::{collect_exception_docs, CodePrecedence};
use crate::source::{ExceptionHandlerSource, RouteSource};
use crate::spec::{ApiSpec, SpecDocument};
use log::info;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Extension hooked into specification construction.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Called once, when the plugin is added to an [`crate::spec::ApiSpec`].
    fn init_spec(&self, _spec: &mut SpecDocument) {}

    /// Called for every [`crate::spec::ApiSpec::path`] registration with the operations
    /// keyed by method; may rewrite them in place.
    fn operation_helper(&self, _path: &str, _operations: &mut Map<String, Value>) {}
}

/// Documents the routes and exception handlers of an application.
///
/// Exception handler docs are collected when the plugin joins a spec. Paths are built on
/// demand with [`RoutesPlugin::build_paths`], so routes registered later are picked up.
pub struct RoutesPlugin {
    routes: Arc<dyn RouteSource>,
    exception_handlers: Arc<dyn ExceptionHandlerSource>,
    precedence: CodePrecedence,
}

impl RoutesPlugin {
    pub fn new<A>(app: Arc<A>) -> Self
    where
        A: RouteSource + ExceptionHandlerSource + 'static,
    {
        Self {
            routes: app.clone(),
            exception_handlers: app,
            precedence: CodePrecedence::default(),
        }
    }

    pub fn code_precedence(mut self, precedence: CodePrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn endpoints(&self) -> impl Iterator<Item = EndpointDescriptor> {
        enumerate_endpoints(self.routes.as_ref())
    }

    /// Writes an operation for every current endpoint into `spec`, through its plugins.
    pub fn build_paths(&self, spec: &mut ApiSpec) -> usize {
        let count = builder::build_paths(spec, self.routes.as_ref());
        info!("Documented {} operations", count);
        count
    }
}

impl Plugin for RoutesPlugin {
    fn name(&self) -> &str {
        "routes"
    }

    fn init_spec(&self, spec: &mut SpecDocument) {
        let registered =
            collect_exception_docs(spec, self.exception_handlers.as_ref(), self.precedence);
        info!("Documented {} error responses", registered);
    }
}
