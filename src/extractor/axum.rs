use crate::docstring::doc_text;
use crate::extractor::{
    combine_paths, extract_handler_name, extract_string_literal, record_handler_doc, HttpMethod,
    RouteExtractor, RouteInfo,
};
use crate::parser::ParsedFile;
use std::collections::HashMap;
use syn::{visit::Visit, Expr, ExprMethodCall, Pat};

use log::{debug, warn};

/// Axum route extractor
pub struct AxumExtractor;

impl RouteExtractor for AxumExtractor {
    fn extract_routes(&self, parsed_files: &[ParsedFile]) -> Vec<RouteInfo> {
        let mut visitor = AxumVisitor::new();

        // First pass: collect routes, nests and handler docs from all files
        for parsed_file in parsed_files {
            visitor.visit_file(&parsed_file.syntax_tree);
        }

        // After collecting from all files, resolve nest prefixes and attach docs
        visitor.finish()
    }
}

/// Where a route or a `.nest()` call was written: the enclosing function and, when the
/// router was assigned with `let`, the binding name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Owner {
    function: Option<String>,
    binding: Option<String>,
}

/// The router mounted by a `.nest()` call
#[derive(Debug, Clone, PartialEq, Eq)]
enum NestTarget {
    /// `.nest("/p", users_router())`
    Function(String),
    /// `.nest("/p", user_routes)` where `user_routes` is a local binding
    Binding {
        function: Option<String>,
        name: String,
    },
}

#[derive(Debug, Clone)]
struct Nest {
    prefix: String,
    target: NestTarget,
    owner: Owner,
}

/// Visitor for traversing the AST and finding Axum routes
struct AxumVisitor {
    routes: Vec<(RouteInfo, Owner)>,
    nests: Vec<Nest>,
    current_prefix: String,
    current_fn: Option<String>,
    current_binding: Option<String>,
    functions: HashMap<String, Option<String>>,
}

/// Guards prefix resolution against routers that nest each other
const MAX_NEST_DEPTH: usize = 16;

impl AxumVisitor {
    fn new() -> Self {
        Self {
            routes: Vec::new(),
            nests: Vec::new(),
            current_prefix: String::new(),
            current_fn: None,
            current_binding: None,
            functions: HashMap::new(),
        }
    }

    /// Resolve nest prefixes and attach handler docs
    fn finish(self) -> Vec<RouteInfo> {
        debug!(
            "Analyzing handlers. Found {} functions, {} routes and {} nests",
            self.functions.len(),
            self.routes.len(),
            self.nests.len()
        );

        self.routes
            .iter()
            .map(|(route, owner)| {
                let prefix = self.owner_prefix(owner, 0);
                let mut route = route.clone();
                route.path = combine_paths(&prefix, &route.path);

                match self.functions.get(&route.handler_name) {
                    Some(doc) => route.doc = doc.clone(),
                    None => warn!("Unknown handler: {}", route.handler_name),
                }
                route
            })
            .collect()
    }

    /// Prefix contributed by the `.nest()` calls that mount the router written at `owner`
    fn owner_prefix(&self, owner: &Owner, depth: usize) -> String {
        if depth >= MAX_NEST_DEPTH {
            warn!("Router nesting too deep, ignoring further prefixes");
            return String::new();
        }

        if let Some(binding) = &owner.binding {
            let target = NestTarget::Binding {
                function: owner.function.clone(),
                name: binding.clone(),
            };
            if let Some(nest) = self.nests.iter().find(|n| n.target == target) {
                return combine_paths(&self.owner_prefix(&nest.owner, depth + 1), &nest.prefix);
            }
        }

        if let Some(function) = &owner.function {
            let target = NestTarget::Function(function.clone());
            if let Some(nest) = self.nests.iter().find(|n| n.target == target) {
                return combine_paths(&self.owner_prefix(&nest.owner, depth + 1), &nest.prefix);
            }
        }

        String::new()
    }

    fn owner(&self) -> Owner {
        Owner {
            function: self.current_fn.clone(),
            binding: self.current_binding.clone(),
        }
    }

    /// Parse a .route() method call
    fn parse_route_method(&mut self, expr: &ExprMethodCall) {
        // .route(path, method_router)
        if expr.args.len() < 2 {
            return;
        }

        let Some(path) = extract_string_literal(&expr.args[0]) else {
            return;
        };
        let full_path = combine_paths(&self.current_prefix, &path);

        for (method, handler_name) in self.parse_method_router(&expr.args[1]) {
            let route = RouteInfo::new(full_path.clone(), method, handler_name);
            self.routes.push((route, self.owner()));
        }
    }

    /// Parse a method router like `get(list).post(create)` into (method, handler) pairs
    fn parse_method_router(&self, expr: &Expr) -> Vec<(HttpMethod, String)> {
        match expr {
            Expr::Call(call_expr) => {
                if let Expr::Path(path_expr) = &*call_expr.func {
                    if let Some(segment) = path_expr.path.segments.last() {
                        if let Some(method) = HttpMethod::parse(&segment.ident.to_string()) {
                            if let Some(handler) = call_expr.args.first() {
                                return vec![(method, extract_handler_name(handler))];
                            }
                        }
                    }
                }
                Vec::new()
            }
            Expr::MethodCall(method_call) => {
                // .layer(), .with_state() etc. keep the methods of the receiver
                let mut methods = self.parse_method_router(&method_call.receiver);
                if let Some(method) = HttpMethod::parse(&method_call.method.to_string()) {
                    if let Some(handler) = method_call.args.first() {
                        methods.push((method, extract_handler_name(handler)));
                    }
                }
                methods
            }
            _ => Vec::new(),
        }
    }

    /// Parse shorthand methods with an explicit path like `.get("/path", handler)`
    ///
    /// Method calls without a path literal are links of a method router chain and are
    /// handled by the enclosing `.route()` call.
    fn parse_shorthand_method(&mut self, expr: &ExprMethodCall, method_name: &str) {
        if expr.args.len() < 2 {
            return;
        }

        let Some(method) = HttpMethod::parse(method_name) else {
            return;
        };
        if let Some(path) = extract_string_literal(&expr.args[0]) {
            let full_path = combine_paths(&self.current_prefix, &path);
            let handler_name = extract_handler_name(&expr.args[1]);
            let route = RouteInfo::new(full_path, method, handler_name);
            self.routes.push((route, self.owner()));
        }
    }

    /// Parse a .nest() method call, visiting an inline router with the nested prefix
    fn parse_nest_method(&mut self, expr: &ExprMethodCall) {
        // .nest(path, router)
        self.visit_expr(&expr.receiver);

        let nested_prefix = expr
            .args
            .first()
            .and_then(extract_string_literal)
            .map(|path| combine_paths(&self.current_prefix, &path));

        let Some(nested_prefix) = nested_prefix else {
            for arg in &expr.args {
                self.visit_expr(arg);
            }
            return;
        };

        if let Some(router) = expr.args.iter().nth(1) {
            if let Some(target) = self.nest_target(router) {
                debug!("Found nest {} -> {:?}", nested_prefix, target);
                self.nests.push(Nest {
                    prefix: nested_prefix.clone(),
                    target,
                    owner: self.owner(),
                });
            }

            let saved = std::mem::replace(&mut self.current_prefix, nested_prefix);
            self.visit_expr(router);
            self.current_prefix = saved;
        }
    }

    /// Identify a router defined elsewhere (a function or a local binding)
    fn nest_target(&self, expr: &Expr) -> Option<NestTarget> {
        match expr {
            Expr::Path(path_expr) if path_expr.path.segments.len() == 1 => {
                Some(NestTarget::Binding {
                    function: self.current_fn.clone(),
                    name: path_expr.path.segments[0].ident.to_string(),
                })
            }
            Expr::Call(call_expr) => {
                if let Expr::Path(path_expr) = &*call_expr.func {
                    let name = path_expr.path.segments.last()?.ident.to_string();
                    // Router::new() starts an inline router, its routes carry the prefix already
                    if name != "new" && name != "default" {
                        return Some(NestTarget::Function(name));
                    }
                }
                None
            }
            Expr::MethodCall(method_call) => self.nest_target(&method_call.receiver),
            _ => None,
        }
    }

    fn record_function(&mut self, name: String, attrs: &[syn::Attribute]) {
        debug!("Found function: {}", name);
        record_handler_doc(&mut self.functions, name, doc_text(attrs));
    }
}

impl<'ast> Visit<'ast> for AxumVisitor {
    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        let method_name = node.method.to_string();

        match method_name.as_str() {
            "route" => self.parse_route_method(node),
            "nest" => {
                self.parse_nest_method(node);
                return;
            }
            "get" | "post" | "put" | "delete" | "patch" | "head" | "options" => {
                self.parse_shorthand_method(node, &method_name)
            }
            _ => {}
        }

        // Continue visiting child nodes
        syn::visit::visit_expr_method_call(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        let fn_name = node.sig.ident.to_string();
        self.record_function(fn_name.clone(), &node.attrs);

        let saved = self.current_fn.replace(fn_name);
        syn::visit::visit_item_fn(self, node);
        self.current_fn = saved;
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        let fn_name = node.sig.ident.to_string();
        self.record_function(fn_name.clone(), &node.attrs);

        let saved = self.current_fn.replace(fn_name);
        syn::visit::visit_impl_item_fn(self, node);
        self.current_fn = saved;
    }

    fn visit_local(&mut self, node: &'ast syn::Local) {
        let binding = match &node.pat {
            Pat::Ident(pat_ident) => Some(pat_ident.ident.to_string()),
            Pat::Type(pat_type) => match &*pat_type.pat {
                Pat::Ident(pat_ident) => Some(pat_ident.ident.to_string()),
                _ => None,
            },
            _ => None,
        };

        let saved = std::mem::replace(&mut self.current_binding, binding);
        syn::visit::visit_local(self, node);
        self.current_binding = saved;
    }
}
