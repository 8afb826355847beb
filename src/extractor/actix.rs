use crate::docstring::doc_text;
use crate::extractor::{
    combine_paths, extract_handler_name, extract_string_literal, record_handler_doc,
    ExceptionHandlerInfo, HttpMethod, RouteExtractor, RouteInfo,
};
use crate::parser::ParsedFile;
use log::{debug, warn};
use std::collections::HashMap;
use syn::{punctuated::Punctuated, visit::Visit, Attribute, Expr, Lit, Meta, Token};

/// Actix-Web route extractor
pub struct ActixExtractor;

impl RouteExtractor for ActixExtractor {
    fn extract_routes(&self, parsed_files: &[ParsedFile]) -> Vec<RouteInfo> {
        let mut visitor = ActixVisitor::new();

        // First pass: collect routes, scopes and handler docs from all files
        for parsed_file in parsed_files {
            visitor.visit_file(&parsed_file.syntax_tree);
        }

        // After collecting from all files, apply scopes and attach docs
        visitor.finish().0
    }

    fn extract_exception_handlers(&self, parsed_files: &[ParsedFile]) -> Vec<ExceptionHandlerInfo> {
        let mut visitor = ActixVisitor::new();

        for parsed_file in parsed_files {
            visitor.visit_file(&parsed_file.syntax_tree);
        }

        visitor.finish().1
    }
}

/// Well-known `StatusCode` constants used with `ErrorHandlers`
const STATUS_CODES: &[(&str, u16)] = &[
    ("BAD_REQUEST", 400),
    ("UNAUTHORIZED", 401),
    ("PAYMENT_REQUIRED", 402),
    ("FORBIDDEN", 403),
    ("NOT_FOUND", 404),
    ("METHOD_NOT_ALLOWED", 405),
    ("NOT_ACCEPTABLE", 406),
    ("REQUEST_TIMEOUT", 408),
    ("CONFLICT", 409),
    ("GONE", 410),
    ("PAYLOAD_TOO_LARGE", 413),
    ("UNSUPPORTED_MEDIA_TYPE", 415),
    ("UNPROCESSABLE_ENTITY", 422),
    ("TOO_MANY_REQUESTS", 429),
    ("INTERNAL_SERVER_ERROR", 500),
    ("NOT_IMPLEMENTED", 501),
    ("BAD_GATEWAY", 502),
    ("SERVICE_UNAVAILABLE", 503),
    ("GATEWAY_TIMEOUT", 504),
];

/// Visitor for traversing the AST and finding Actix-Web routes
struct ActixVisitor {
    /// Routes declared with `#[get("/path")]` style macros
    macro_routes: Vec<RouteInfo>,
    /// Routes declared with `.route("/path", web::get().to(handler))`
    call_routes: Vec<RouteInfo>,
    /// Error handlers registered with `ErrorHandlers::new().handler(code, handler)`
    exception_handlers: Vec<ExceptionHandlerInfo>,
    current_scope: String,
    functions: HashMap<String, Option<String>>,
    /// Scopes under which a macro-routed function is registered via `.service(f)`
    service_scopes: HashMap<String, Vec<String>>,
}

impl ActixVisitor {
    fn new() -> Self {
        Self {
            macro_routes: Vec::new(),
            call_routes: Vec::new(),
            exception_handlers: Vec::new(),
            current_scope: String::new(),
            functions: HashMap::new(),
            service_scopes: HashMap::new(),
        }
    }

    fn finish(self) -> (Vec<RouteInfo>, Vec<ExceptionHandlerInfo>) {
        debug!(
            "Analyzing handlers. Found {} functions, {} macro routes, {} call routes",
            self.functions.len(),
            self.macro_routes.len(),
            self.call_routes.len()
        );

        let mut routes = Vec::new();
        for route in &self.macro_routes {
            match self.service_scopes.get(&route.handler_name) {
                Some(scopes) => {
                    for scope in scopes {
                        let mut scoped = route.clone();
                        scoped.path = combine_paths(scope, &route.path);
                        routes.push(scoped);
                    }
                }
                None => routes.push(route.clone()),
            }
        }

        for route in &self.call_routes {
            let mut route = route.clone();
            route.doc = self.handler_doc(&route.handler_name);
            routes.push(route);
        }

        let exception_handlers = self
            .exception_handlers
            .iter()
            .map(|handler| ExceptionHandlerInfo {
                doc: self.handler_doc(&handler.handler_name),
                ..handler.clone()
            })
            .collect();

        (routes, exception_handlers)
    }

    fn handler_doc(&self, handler_name: &str) -> Option<String> {
        match self.functions.get(handler_name) {
            Some(doc) => doc.clone(),
            None => {
                warn!("Unknown handler: {}", handler_name);
                None
            }
        }
    }

    /// Find and parse route macros (#[get], #[post], etc.)
    fn find_route_macros(&mut self, item_fn: &syn::ItemFn) {
        let fn_name = item_fn.sig.ident.to_string();

        for attr in &item_fn.attrs {
            if let Some((method, path)) = self.parse_route_macro(attr) {
                let mut route = RouteInfo::new(path, method, fn_name.clone());
                route.doc = doc_text(&item_fn.attrs);
                self.macro_routes.push(route);
            }
        }
    }

    /// Parse a route macro attribute to extract HTTP method and path
    fn parse_route_macro(&self, attr: &Attribute) -> Option<(HttpMethod, String)> {
        // Get the attribute path (e.g., "get", "post", etc.)
        let attr_name = attr.path().segments.last()?.ident.to_string();

        // Parse HTTP method from attribute name
        let method = HttpMethod::parse(&attr_name)?;

        // Actix macros look like: #[get("/path")] or #[get("/path", wrap = "...")]
        let path = match &attr.meta {
            Meta::List(meta_list) => {
                let args = meta_list
                    .parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)
                    .ok()?;
                args.first().and_then(extract_string_literal)
            }
            _ => None,
        }?;

        Some((method, path))
    }

    /// Parse `.service(...)`: remember the scope each registered function lives under
    fn parse_service(&mut self, expr: &syn::ExprMethodCall) {
        let scope = match chain_prefix(&expr.receiver, "scope") {
            Some(scope) => combine_paths(&self.current_scope, &scope),
            None => self.current_scope.clone(),
        };

        self.visit_expr(&expr.receiver);

        let saved = std::mem::replace(&mut self.current_scope, scope);
        for arg in &expr.args {
            if let Expr::Path(path_expr) = arg {
                if let Some(segment) = path_expr.path.segments.last() {
                    let scopes = self
                        .service_scopes
                        .entry(segment.ident.to_string())
                        .or_default();
                    if !scopes.contains(&self.current_scope) {
                        scopes.push(self.current_scope.clone());
                    }
                }
            }
            self.visit_expr(arg);
        }
        self.current_scope = saved;
    }

    /// Parse `.route("/path", web::get().to(handler))` and
    /// `web::resource("/path").route(web::get().to(handler))`
    fn parse_route_call(&mut self, expr: &syn::ExprMethodCall) {
        let (path, method_router) = match expr.args.len() {
            2 => match extract_string_literal(&expr.args[0]) {
                Some(path) => (path, &expr.args[1]),
                None => return,
            },
            1 => match chain_prefix(&expr.receiver, "resource") {
                Some(path) => (path, &expr.args[0]),
                None => return,
            },
            _ => return,
        };

        let Some((method, handler_name)) = parse_method_handler(method_router) else {
            return;
        };

        let base = match chain_prefix(&expr.receiver, "scope") {
            Some(scope) => combine_paths(&self.current_scope, &scope),
            None => self.current_scope.clone(),
        };
        let full_path = combine_paths(&base, &path);

        debug!("Found route call: {} {} -> {}", method, full_path, handler_name);
        self.call_routes
            .push(RouteInfo::new(full_path, method, handler_name));
    }

    /// Parse `ErrorHandlers::new().handler(StatusCode::BAD_REQUEST, handler)`
    fn parse_error_handler(&mut self, expr: &syn::ExprMethodCall) {
        if expr.args.len() != 2 {
            return;
        }

        if let Some(status_code) = status_code(&expr.args[0]) {
            let handler_name = extract_handler_name(&expr.args[1]);
            debug!("Found error handler: {} -> {}", status_code, handler_name);
            self.exception_handlers.push(ExceptionHandlerInfo {
                status_code,
                handler_name,
                doc: None,
            });
        }
    }
}

impl<'ast> Visit<'ast> for ActixVisitor {
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        let fn_name = node.sig.ident.to_string();
        record_handler_doc(&mut self.functions, fn_name, doc_text(&node.attrs));

        // Look for route macros on this function
        self.find_route_macros(node);

        // Continue visiting child nodes
        syn::visit::visit_item_fn(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        match node.method.to_string().as_str() {
            "service" => {
                // Visits receiver and arguments itself, with the scope applied
                self.parse_service(node);
                return;
            }
            "route" => self.parse_route_call(node),
            "handler" => self.parse_error_handler(node),
            _ => {}
        }

        // Continue visiting child nodes
        syn::visit::visit_expr_method_call(self, node);
    }
}

/// Path literal of the `web::scope("/p")` / `web::resource("/p")` call a builder chain starts from
fn chain_prefix(expr: &Expr, constructor: &str) -> Option<String> {
    match expr {
        Expr::Call(call_expr) => {
            if let Expr::Path(path_expr) = &*call_expr.func {
                if path_expr.path.segments.last()?.ident == constructor {
                    return call_expr.args.first().and_then(extract_string_literal);
                }
            }
            None
        }
        Expr::MethodCall(method_call) => chain_prefix(&method_call.receiver, constructor),
        _ => None,
    }
}

/// Parse `web::get().to(handler)`, possibly with guards in between
fn parse_method_handler(expr: &Expr) -> Option<(HttpMethod, String)> {
    let Expr::MethodCall(method_call) = expr else {
        return None;
    };
    if method_call.method != "to" {
        return None;
    }

    let handler_name = extract_handler_name(method_call.args.first()?);
    let method = route_method(&method_call.receiver)?;
    Some((method, handler_name))
}

fn route_method(expr: &Expr) -> Option<HttpMethod> {
    match expr {
        Expr::Call(call_expr) => match &*call_expr.func {
            Expr::Path(path_expr) => {
                HttpMethod::parse(&path_expr.path.segments.last()?.ident.to_string())
            }
            _ => None,
        },
        Expr::MethodCall(method_call) => route_method(&method_call.receiver),
        _ => None,
    }
}

/// Status code of `StatusCode::NOT_FOUND`, `StatusCode::from_u16(404)` or a bare literal
fn status_code(expr: &Expr) -> Option<u16> {
    match expr {
        Expr::Path(path_expr) => {
            let name = path_expr.path.segments.last()?.ident.to_string();
            STATUS_CODES
                .iter()
                .find(|(constant, _)| *constant == name)
                .map(|(_, code)| *code)
        }
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Int(lit_int) => lit_int.base10_parse().ok(),
            _ => None,
        },
        Expr::Call(call_expr) => match &*call_expr.func {
            Expr::Path(path_expr) if path_expr.path.segments.last()?.ident == "from_u16" => {
                status_code(call_expr.args.first()?)
            }
            _ => None,
        },
        // StatusCode::from_u16(404).unwrap()
        Expr::MethodCall(method_call) => status_code(&method_call.receiver),
        _ => None,
    }
}
