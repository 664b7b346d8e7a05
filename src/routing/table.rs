//! Route table module
//!
//! Holds the registered (method, pattern, handler) entries. The table is
//! built once at startup and never mutated afterwards.

use hyper::Method;

/// Handler a route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    ServeFile,
    StoreFile,
    DeleteFile,
}

/// `/*name` pattern: captures everything after the leading slash,
/// nested segments included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    name: String,
}

impl PathPattern {
    pub fn wildcard(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name the captured value is stored under
    pub fn param_name(&self) -> &str {
        &self.name
    }
}

/// Registered route
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: HandlerKind,
}

impl Route {
    pub fn new(method: Method, pattern: PathPattern, handler: HandlerKind) -> Self {
        Self {
            method,
            pattern,
            handler,
        }
    }
}

/// Ordered set of routes; order decides the `Allow` header order
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The file storage routes: GET, POST and DELETE on `/*filename`
    pub fn file_routes() -> Self {
        let pattern = PathPattern::wildcard("filename");
        Self::new(vec![
            Route::new(Method::GET, pattern.clone(), HandlerKind::ServeFile),
            Route::new(Method::POST, pattern.clone(), HandlerKind::StoreFile),
            Route::new(Method::DELETE, pattern, HandlerKind::DeleteFile),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_routes() {
        let table = RouteTable::file_routes();
        let methods: Vec<&Method> = table.routes().iter().map(|r| &r.method).collect();
        assert_eq!(methods, vec![&Method::GET, &Method::POST, &Method::DELETE]);
        assert!(table
            .routes()
            .iter()
            .all(|r| r.pattern.param_name() == "filename"));
    }
}
