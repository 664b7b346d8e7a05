//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route resolution, dispatch to
//! the file handlers, `Server` header and access logging.

use crate::config::AppState;
use crate::handler::{delete, static_files, upload};
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, HandlerKind, RouteOutcome};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Conditional and range headers of a GET request
pub struct RequestContext<'a> {
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub range_header: Option<&'a str>,
    pub debug: bool,
}

impl<'a> RequestContext<'a> {
    pub fn from_headers(headers: &'a HeaderMap, debug: bool) -> Self {
        let header = move |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        Self {
            if_none_match: header("if-none-match"),
            if_modified_since: header("if-modified-since"),
            range_header: header("range"),
            debug,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let entry = state
        .config
        .logging
        .access_log
        .then(|| new_access_entry(&req, remote_addr));

    let mut response = dispatch(req, &state).await;

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        // File bodies are streamed, so the size comes from the header
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the route and run the selected handler
///
/// Generic over the body so the whole request path can be driven with
/// in-memory bodies.
pub async fn dispatch<B>(req: Request<B>, state: &AppState) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let (handler, name) = match routing::resolve(req.method(), req.uri().path(), &state.routes) {
        RouteOutcome::Matched { route, params } => (
            route.handler,
            params
                .get(route.pattern.param_name())
                .unwrap_or_default()
                .to_owned(),
        ),
        RouteOutcome::MethodNotAllowed { allow } => {
            return http::build_405_response(&routing::allow_header(&allow));
        }
        RouteOutcome::NotFound => return http::build_404_response(),
    };

    match handler {
        HandlerKind::ServeFile => {
            let ctx = RequestContext::from_headers(req.headers(), state.debug_enabled());
            static_files::serve_file(&ctx, state, &name).await
        }
        HandlerKind::StoreFile => upload::store_files(req, state, &name).await,
        HandlerKind::DeleteFile => delete::delete_file(state, &name).await,
    }
}

fn new_access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let uri = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let mut entry = AccessLogEntry::new(remote_addr.ip().to_string(), req.method().to_string(), uri);
    entry.http_version = match req.version() {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string();
    entry.user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}
