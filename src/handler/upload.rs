//! Multipart upload module
//!
//! POST on a name treats it as a folder and stores every file part of the
//! multipart form inside it, under the part's own base filename.

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Response, StatusCode};
use multer::{Constraints, Multipart, SizeLimit};
use std::fmt;
use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Failure while consuming the form
#[derive(Debug)]
enum UploadError {
    Multipart(multer::Error),
    Io(io::Error),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multipart(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl From<multer::Error> for UploadError {
    fn from(e: multer::Error) -> Self {
        Self::Multipart(e)
    }
}

impl From<io::Error> for UploadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Store every file part of the request body under `folder`
///
/// Answers a single `ok` once all parts are written. Any failure aborts the
/// request with 500 and the error text; parts written before the failure
/// stay on disk.
pub async fn store_files<B>(req: Request<B>, state: &AppState, folder: &str) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let folder_path = state.storage.resolve(folder);
    if let Err(e) = fs::create_dir_all(&folder_path).await {
        return upload_failed(folder, &e.into());
    }

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let boundary = match multer::parse_boundary(content_type) {
        Ok(b) => b,
        Err(e) => return upload_failed(folder, &e.into()),
    };

    let constraints =
        Constraints::new().size_limit(SizeLimit::new().whole_stream(state.max_form_size()));
    let multipart =
        Multipart::with_constraints(req.into_body().into_data_stream(), boundary, constraints);

    match write_parts(multipart, &folder_path, state.debug_enabled()).await {
        Ok(()) => http::build_ok_response(),
        Err(e) => upload_failed(folder, &e),
    }
}

async fn write_parts(
    mut multipart: Multipart<'_>,
    folder: &Path,
    debug: bool,
) -> Result<(), UploadError> {
    while let Some(mut field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().and_then(sanitize_filename) else {
            // Plain form value, consume and move on
            while field.chunk().await?.is_some() {}
            continue;
        };

        let path = folder.join(&file_name);
        let mut file = fs::File::create(&path).await?;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if debug {
            logger::log_debug(&format!("Uploaded file {}", path.display()));
        }
    }
    Ok(())
}

fn upload_failed(folder: &str, err: &UploadError) -> Response<ResponseBody> {
    logger::log_error(&format!("Upload to '{folder}' failed: {err}"));
    http::build_text_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

/// Reduce a client-supplied filename to its last path component
///
/// Returns `None` for names that cannot be stored inside the folder.
fn sanitize_filename(name: &str) -> Option<String> {
    let base = name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return None;
    }
    Some(base.to_string())
}
