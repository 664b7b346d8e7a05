//! Stored file serving module
//!
//! Handles GET on a stored name: MIME type detection, conditional
//! requests, byte ranges and streaming the file body.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, response::FileValidators, RangeParseResult, ResponseBody};
use crate::logger;
use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::{Response, StatusCode};
use std::io::{self, SeekFrom};
use std::time::SystemTime;
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Serve the file stored under `name`
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    name: &str,
) -> Response<ResponseBody> {
    let path = state.storage.resolve(name);
    if ctx.debug {
        logger::log_debug(&format!("Served path: {}", path.display()));
    }

    let metadata = match fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) => return io_error_response(&e, name),
    };
    // Folders are never listed
    if metadata.is_dir() {
        return http::build_404_response();
    }

    let file = match File::open(&path).await {
        Ok(f) => f,
        Err(e) => return io_error_response(&e, name),
    };

    let content_type = mime::get_content_type(&path);
    let response = build_static_file_response(
        ctx,
        file,
        &content_type,
        metadata.len(),
        metadata.modified().ok(),
    )
    .await;
    response.unwrap_or_else(|e| io_error_response(&e, name))
}

/// Map a filesystem error on the read path to a status
fn io_error_response(err: &io::Error, name: &str) -> Response<ResponseBody> {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            http::build_text_response(StatusCode::FORBIDDEN, "403 Forbidden")
        }
        _ => {
            logger::log_error(&format!("Failed to read '{name}': {err}"));
            http::build_text_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

/// Build file response with `ETag`, `Last-Modified` and Range support
///
/// Validators come from metadata; the content is only read while the body
/// streams out.
async fn build_static_file_response(
    ctx: &RequestContext<'_>,
    mut file: File,
    content_type: &str,
    total_size: u64,
    modified: Option<SystemTime>,
) -> io::Result<Response<ResponseBody>> {
    let etag = cache::generate_etag(total_size, modified);
    let last_modified = modified.map(cache::format_last_modified);
    let validators = FileValidators {
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    if cache::is_not_modified(ctx.if_none_match, ctx.if_modified_since, &etag, modified) {
        return Ok(http::build_304_response(&validators));
    }

    match http::parse_range_header(ctx.range_header, total_size) {
        RangeParseResult::Valid(range) => {
            file.seek(SeekFrom::Start(range.start)).await?;
            let body = file_body(file.take(range.end - range.start + 1));
            Ok(http::response::build_partial_response(
                body,
                content_type,
                &validators,
                range.start,
                range.end,
                total_size,
            ))
        }
        RangeParseResult::NotSatisfiable => Ok(http::build_416_response(total_size)),
        RangeParseResult::None => Ok(http::response::build_file_response(
            file_body(file),
            content_type,
            total_size,
            &validators,
        )),
    }
}

/// Stream a reader out as response frames
fn file_body<R>(reader: R) -> ResponseBody
where
    R: AsyncRead + Send + 'static,
{
    StreamBody::new(ReaderStream::new(reader).map_ok(Frame::data)).boxed_unsync()
}
