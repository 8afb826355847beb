use crate::extractor::{combine_paths, HttpMethod};
use crate::source::{
    ExceptionHandlerEntry, ExceptionHandlerSource, HandlerDoc, HandlerKey, RouteEntry,
    RouteSource,
};
use log::debug;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory routing table of a host application.
///
/// Cloning is cheap and clones share the same table, so an application can keep registering
/// routes after the table was handed to the documentation endpoint. A `GET` route also answers
/// `HEAD`, which is recorded as an implicit method and never documented.
///
/// # Example
///
/// ```
/// use swagger_from_source::extractor::HttpMethod;
/// use swagger_from_source::routes::RouteTable;
/// use swagger_from_source::source::{HandlerDoc, RouteSource};
///
/// let table = RouteTable::new();
/// table.route(
///     "/users",
///     &[HttpMethod::Get],
///     HandlerDoc::new("list_users").with_doc("Lists users."),
/// );
/// assert_eq!(table.routes()[0].methods, vec![HttpMethod::Get, HttpMethod::Head]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    routes: Vec<RouteEntry>,
    mounts: Vec<(String, RouteTable)>,
    exception_handlers: Vec<ExceptionHandlerEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `handler` for `methods` on `path`.
    pub fn route(&self, path: &str, methods: &[HttpMethod], handler: HandlerDoc) -> &Self {
        let mut entry = RouteEntry::new(path, methods.to_vec(), handler);
        if methods.contains(&HttpMethod::Get) && !methods.contains(&HttpMethod::Head) {
            entry.methods.push(HttpMethod::Head);
            entry.implicit_methods.push(HttpMethod::Head);
        }
        self.add_route(entry)
    }

    /// Registers a fully specified entry as-is.
    pub fn add_route(&self, entry: RouteEntry) -> &Self {
        debug!("Registering route {} {:?}", entry.path, entry.methods);
        self.write().routes.push(entry);
        self
    }

    /// Mounts a sub-table under `prefix`. Later changes to the sub-table are visible.
    pub fn mount(&self, prefix: &str, table: RouteTable) -> &Self {
        self.write().mounts.push((prefix.to_string(), table));
        self
    }

    /// Registers an exception handler. Registering the same key again replaces the handler.
    pub fn exception_handler(&self, key: HandlerKey, handler: HandlerDoc) -> &Self {
        let mut inner = self.write();
        inner.exception_handlers.retain(|entry| entry.key != key);
        inner
            .exception_handlers
            .push(ExceptionHandlerEntry { key, handler });
        self
    }

    fn collect_routes(&self, prefix: &str, depth: usize, out: &mut Vec<RouteEntry>) {
        // A table mounted into itself would recurse forever
        if depth > MAX_MOUNT_DEPTH {
            return;
        }

        let mounts = {
            let inner = self.read();
            for entry in &inner.routes {
                let mut entry = entry.clone();
                entry.path = combine_paths(prefix, &entry.path);
                out.push(entry);
            }
            // released before descending, the sub-table may be this table
            inner.mounts.clone()
        };
        for (mount_prefix, table) in &mounts {
            table.collect_routes(&combine_paths(prefix, mount_prefix), depth + 1, out);
        }
    }
}

const MAX_MOUNT_DEPTH: usize = 16;

impl RouteSource for RouteTable {
    fn routes(&self) -> Vec<RouteEntry> {
        let mut routes = Vec::new();
        self.collect_routes("", 0, &mut routes);
        routes
    }
}

impl ExceptionHandlerSource for RouteTable {
    fn exception_handlers(&self) -> Vec<ExceptionHandlerEntry> {
        self.read().exception_handlers.clone()
    }
}
