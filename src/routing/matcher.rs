//! Route matching module
//!
//! Resolves (method, path) against a route table. Resolution is a pure
//! function: it only returns captured parameters for the route it selects.

use hyper::Method;

use super::table::{Route, RouteTable};
#[cfg(test)]
use super::table::{HandlerKind, PathPattern};

/// Captured path parameters of the selected route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Result of resolving a request against the route table
#[derive(Debug)]
pub enum RouteOutcome<'a> {
    /// A route for the request method matched
    Matched { route: &'a Route, params: Params },
    /// Other methods match this path; the list is de-duplicated, table order
    MethodNotAllowed { allow: Vec<Method> },
    /// No pattern matches the path
    NotFound,
}

#[cfg(test)]
impl RouteOutcome<'_> {
    pub fn handler(&self) -> Option<HandlerKind> {
        match self {
            Self::Matched { route, .. } => Some(route.handler),
            _ => None,
        }
    }
}

/// Resolve a request path for the given method
pub fn resolve<'a>(method: &Method, path: &str, table: &'a RouteTable) -> RouteOutcome<'a> {
    let Some(decoded) = percent_decode(path) else {
        return RouteOutcome::NotFound;
    };

    let Some(value) = capture_path(&decoded) else {
        return RouteOutcome::NotFound;
    };

    let mut allow: Vec<Method> = Vec::new();
    for route in table.routes() {
        if route.method == *method {
            let params = Params(vec![(route.pattern.param_name().to_string(), value.clone())]);
            return RouteOutcome::Matched { route, params };
        }
        if !allow.contains(&route.method) {
            allow.push(route.method.clone());
        }
    }

    if allow.is_empty() {
        RouteOutcome::NotFound
    } else {
        RouteOutcome::MethodNotAllowed { allow }
    }
}

/// Value a wildcard pattern captures from a decoded path, if routable
fn capture_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix('/')?;
    is_safe_relative(rest).then(|| rest.to_string())
}

/// Comma-joined method list for the `Allow` header
pub fn allow_header(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A captured value must stay below the storage root: no empty, `.` or `..`
/// segments, no backslashes and no NUL bytes.
fn is_safe_relative(value: &str) -> bool {
    !value.is_empty()
        && !value.contains(|c: char| c == '\\' || c == '\0')
        && value
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Decode `%XX` escapes; malformed escapes or invalid UTF-8 yield `None`
fn percent_decode(path: &str) -> Option<String> {
    if !path.contains('%') {
        return Some(path.to_string());
    }

    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = path.get(i + 1..i + 3)?;
            // from_str_radix alone would accept a sign such as `%+1`
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_methods_dispatch() {
        let table = RouteTable::file_routes();
        let cases = [
            (Method::GET, HandlerKind::ServeFile),
            (Method::POST, HandlerKind::StoreFile),
            (Method::DELETE, HandlerKind::DeleteFile),
        ];
        for (method, expected) in cases {
            let outcome = resolve(&method, "/docs/a.txt", &table);
            assert_eq!(outcome.handler(), Some(expected), "method {method}");
            match outcome {
                RouteOutcome::Matched { params, .. } => {
                    assert_eq!(params.get("filename"), Some("docs/a.txt"));
                }
                other => panic!("Expected Matched, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_method_not_allowed_lists_all_matching() {
        let table = RouteTable::file_routes();
        for method in [Method::PUT, Method::PATCH, Method::HEAD, Method::OPTIONS] {
            match resolve(&method, "/a.txt", &table) {
                RouteOutcome::MethodNotAllowed { allow } => {
                    assert_eq!(allow, vec![Method::GET, Method::POST, Method::DELETE]);
                    assert_eq!(allow_header(&allow), "GET, POST, DELETE");
                }
                other => panic!("Expected MethodNotAllowed, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_allow_lists_only_registered_methods() {
        let pattern = PathPattern::wildcard("filename");
        let table = RouteTable::new(vec![
            Route::new(Method::GET, pattern.clone(), HandlerKind::ServeFile),
            Route::new(Method::POST, pattern, HandlerKind::StoreFile),
        ]);
        match resolve(&Method::DELETE, "/a/b.txt", &table) {
            RouteOutcome::MethodNotAllowed { allow } => {
                assert_eq!(allow, vec![Method::GET, Method::POST]);
            }
            other => panic!("Expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_methods_are_listed_once() {
        let table = RouteTable::new(vec![
            Route::new(
                Method::GET,
                PathPattern::wildcard("name"),
                HandlerKind::ServeFile,
            ),
            Route::new(
                Method::GET,
                PathPattern::wildcard("path"),
                HandlerKind::ServeFile,
            ),
        ]);
        match resolve(&Method::POST, "/x", &table) {
            RouteOutcome::MethodNotAllowed { allow } => assert_eq!(allow, vec![Method::GET]),
            other => panic!("Expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn test_first_matching_route_supplies_params() {
        let table = RouteTable::new(vec![
            Route::new(
                Method::GET,
                PathPattern::wildcard("name"),
                HandlerKind::ServeFile,
            ),
            Route::new(
                Method::GET,
                PathPattern::wildcard("path"),
                HandlerKind::ServeFile,
            ),
        ]);
        match resolve(&Method::GET, "/x", &table) {
            RouteOutcome::Matched { params, .. } => {
                assert_eq!(params.get("name"), Some("x"));
                assert_eq!(params.get("path"), None);
            }
            other => panic!("Expected Matched, got {other:?}"),
        }
    }

    #[test]
    fn test_unroutable_paths() {
        let table = RouteTable::file_routes();
        for path in ["/", "", "/a/../b", "/..", "/./a", "/a//b", "/a/", "/a\\b", "/%zz"] {
            assert!(
                matches!(resolve(&Method::GET, path, &table), RouteOutcome::NotFound),
                "path {path:?} should not route"
            );
        }
    }

    #[test]
    fn test_percent_decoding() {
        let table = RouteTable::file_routes();
        match resolve(&Method::GET, "/my%20file.txt", &table) {
            RouteOutcome::Matched { params, .. } => {
                assert_eq!(params.get("filename"), Some("my file.txt"));
            }
            other => panic!("Expected Matched, got {other:?}"),
        }
        // Encoded traversal is still rejected after decoding
        assert!(matches!(
            resolve(&Method::GET, "/%2e%2e/etc/passwd", &table),
            RouteOutcome::NotFound
        ));
    }

    #[test]
    fn test_malformed_escapes_do_not_route() {
        let table = RouteTable::file_routes();
        for path in ["/a%+1b", "/a%-1b", "/a%1", "/a%", "/a% 1b", "/a%1g"] {
            assert!(
                matches!(resolve(&Method::GET, path, &table), RouteOutcome::NotFound),
                "path {path:?} should not route"
            );
        }
    }

    #[test]
    fn test_params_only_for_selected_route() {
        let table = RouteTable::file_routes();
        match resolve(&Method::DELETE, "/x", &table) {
            RouteOutcome::Matched { route, params } => {
                assert_eq!(route.method, Method::DELETE);
                assert_eq!(params, Params(vec![("filename".into(), "x".into())]));
                assert_eq!(params.get("other"), None);
            }
            other => panic!("Expected Matched, got {other:?}"),
        }
    }
}
