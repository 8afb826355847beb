use crate::extractor::HttpMethod;
use crate::source::{HandlerDoc, RouteSource};

/// One documented operation: a path, a method and the handler serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    path: String,
    method: HttpMethod,
    handler: HandlerDoc,
}

impl EndpointDescriptor {
    pub fn new(path: &str, method: HttpMethod, handler: HandlerDoc) -> Self {
        Self {
            path: normalize_path(path),
            method,
            handler,
        }
    }

    /// Path in OpenAPI template form (`/users/{id}`)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn handler(&self) -> &HandlerDoc {
        &self.handler
    }

    /// Handler identifier
    pub fn name(&self) -> &str {
        &self.handler.name
    }

    pub fn operation_id(&self) -> String {
        format!("{}_{}", self.method.as_lower(), self.handler.name)
    }
}

/// Walks the route table of `source` once, yielding one descriptor per documented method.
///
/// Implicit methods and routes excluded from the schema are skipped. Each call walks the
/// table again.
pub fn enumerate_endpoints(source: &dyn RouteSource) -> impl Iterator<Item = EndpointDescriptor> {
    source
        .routes()
        .into_iter()
        .filter(|route| route.include_in_schema)
        .flat_map(|route| {
            route
                .methods
                .iter()
                .filter(|method| !route.implicit_methods.contains(method))
                .map(|method| EndpointDescriptor::new(&route.path, *method, route.handler.clone()))
                .collect::<Vec<_>>()
        })
}

/// Rewrites `:param` and `*rest` segments into `{param}` / `{rest}`, and drops the regex of
/// `{param:regex}` segments.
fn normalize_path(path: &str) -> String {
    strip_param_patterns(path)
        .split('/')
        .map(|segment| match segment.strip_prefix([':', '*']) {
            Some(name) if !name.is_empty() => format!("{{{}}}", name),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

// The regex may itself contain braces (`{code:\d{3}}`) or slashes.
fn strip_param_patterns(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    let mut in_pattern = false;

    for c in path.chars() {
        match c {
            '{' => {
                depth += 1;
                if !in_pattern {
                    out.push(c);
                }
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    in_pattern = false;
                    out.push(c);
                } else if !in_pattern {
                    out.push(c);
                }
            }
            ':' if depth == 1 && !in_pattern => in_pattern = true,
            _ if !in_pattern => out.push(c),
            _ => {}
        }
    }
    out
}
