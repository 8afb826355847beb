//! Serving the generated document over HTTP.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::SwaggerConfig;
use crate::plugin::RoutesPlugin;
use crate::source::{ExceptionHandlerSource, RouteSource};
use crate::spec::ApiSpec;

pub const SWAGGER_JSON_PATH: &str = "/swagger.json";
pub const SWAGGER_VERSION: &str = "2.0";

const FORWARDED_PREFIX_HEADER: &str = "x-forwarded-prefix";

/// Spec shared between the endpoint and the application, which may keep annotating it.
pub type SharedSpec = Arc<RwLock<ApiSpec>>;

/// Shared state for the swagger handler
struct SwaggerState {
    spec: SharedSpec,
    routes: Arc<RoutesPlugin>,
}

/// Mounts `GET /swagger.json` on `router`, documenting the routes of `app`.
///
/// The caller's plugins are added first, then a [`RoutesPlugin`] over `app`. Paths are
/// rebuilt from the current routes of `app` on every request, on a copy of the shared spec.
pub fn add_swagger_json_endpoint<S, A>(
    router: Router<S>,
    app: Arc<A>,
    config: SwaggerConfig,
) -> (Router<S>, SharedSpec)
where
    S: Clone + Send + Sync + 'static,
    A: RouteSource + ExceptionHandlerSource + 'static,
{
    let routes =
        Arc::new(RoutesPlugin::new(app).code_precedence(config.code_precedence));
    let spec = config.to_spec().with_plugin(routes.clone());
    debug!("Swagger endpoint configured: {:?}", config);

    let spec: SharedSpec = Arc::new(RwLock::new(spec));
    let state = Arc::new(SwaggerState {
        spec: spec.clone(),
        routes,
    });

    let router = router.route(SWAGGER_JSON_PATH, get(swagger_json).with_state(state));
    (router, spec)
}

/// Serve the swagger document of `router` until the process stops
pub async fn serve(addr: &str, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving {} on http://{}", SWAGGER_JSON_PATH, listener.local_addr()?);
    axum::serve(listener, router).await
}

async fn swagger_json(State(state): State<Arc<SwaggerState>>, headers: HeaderMap) -> Json<Value> {
    let mut spec = state.spec.read().await.clone();
    state.routes.build_paths(&mut spec);

    if let Some(prefix) = headers
        .get(FORWARDED_PREFIX_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        debug!("Using forwarded prefix {}", prefix);
        spec.document_mut()
            .options_mut()
            .insert("basePath".to_string(), Value::String(prefix.to_string()));
    }

    Json(spec.to_value())
}
