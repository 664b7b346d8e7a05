//! Stored file removal

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger;
use hyper::{Response, StatusCode};
use std::io;
use std::path::Path;
use tokio::fs;

/// Remove the file or folder stored under `name`
pub async fn delete_file(state: &AppState, name: &str) -> Response<ResponseBody> {
    if name.is_empty() {
        return http::build_text_response(StatusCode::NOT_IMPLEMENTED, "Not yet implemented");
    }

    let path = state.storage.resolve(name);
    match remove_path(&path).await {
        Ok(()) => {
            if state.debug_enabled() {
                logger::log_debug(&format!("Removed file {}", path.display()));
            }
            http::build_ok_response()
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            http::build_text_response(StatusCode::NOT_FOUND, &e.to_string())
        }
        Err(e) => {
            logger::log_error(&format!("Failed to remove '{name}': {e}"));
            http::build_text_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Folders go recursively; symlinks are removed, never followed
async fn remove_path(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path).await?.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}
