//! MIME type detection module
//!
//! Content-Type from the file extension; text types get an explicit UTF-8
//! charset.

use std::path::Path;

use mime_guess::mime;

/// Get Content-Type for a stored file, `application/octet-stream` if unknown
pub fn get_content_type(path: &Path) -> String {
    let guess = mime_guess::from_path(path).first_or_octet_stream();
    if guess.type_() == mime::TEXT && guess.get_param(mime::CHARSET).is_none() {
        format!("{}; charset=utf-8", guess.essence_str())
    } else {
        guess.to_string()
    }
}
