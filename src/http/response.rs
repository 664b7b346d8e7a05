//! HTTP response building module
//!
//! Builders for the handful of responses the file server emits. Every
//! response carries a boxed body so stored files can be streamed while
//! short messages stay in memory.

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io;

/// Body of every response: in-memory text or a file stream
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Validators attached to every successful file response
pub struct FileValidators<'a> {
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

/// Wrap in-memory bytes as a response body
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Build 200 OK response with body `ok`
pub fn build_ok_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::OK, "ok")
}

/// Build a plain-text response carrying a status and message
///
/// Failure bodies carry the raw error text of the failed operation.
pub fn build_text_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", message.len())
        .header("X-Content-Type-Options", "nosniff")
        .body(full_body(message.to_owned()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(full_body(message.to_owned()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response listing the methods that match
pub fn build_405_response(allow: &str) -> Response<ResponseBody> {
    const BODY: &str = "405 Method Not Allowed";
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", BODY.len())
        .header("Allow", allow)
        .body(full_body(BODY))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full_body(BODY))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(validators: &FileValidators<'_>) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", validators.etag);
    if let Some(last_modified) = validators.last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(full_body(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(full_body(Bytes::new()))
    })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> Response<ResponseBody> {
    const BODY: &str = "Range Not Satisfiable";
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", BODY.len())
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(full_body(BODY))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(full_body(BODY))
        })
}

/// Build 200 file response; `body` yields exactly `content_length` bytes
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
    validators: &FileValidators<'_>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", validators.etag);
    if let Some(last_modified) = validators.last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(full_body(Bytes::new()))
    })
}

/// Build 206 Partial Content response; `body` yields bytes `start..=end`
pub fn build_partial_response(
    body: ResponseBody,
    content_type: &str,
    validators: &FileValidators<'_>,
    start: u64,
    end: u64,
    total_size: u64,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", content_type)
        .header("Content-Length", end - start + 1)
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", validators.etag);
    if let Some(last_modified) = validators.last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(full_body(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
