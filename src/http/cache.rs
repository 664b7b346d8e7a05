//! HTTP cache validator module
//!
//! Provides `ETag` generation and conditional GET evaluation
//! (`If-None-Match`, `If-Modified-Since`).

use std::time::{SystemTime, UNIX_EPOCH};

/// Generate `ETag` from file metadata, so the content is never read
///
/// # Returns
/// Quoted `ETag` string of hex length and modification time in
/// nanoseconds, e.g., `"5-18c9e2a4f1b00000"`
pub fn generate_etag(len: u64, modified: Option<SystemTime>) -> String {
    let nanos = modified
        .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    format!("\"{len:x}-{nanos:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Accepts a single tag, a comma-separated list, weak tags (`W/"..."`)
/// and the `*` wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|tag| {
            tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag
        })
    })
}

/// Format a modification time as an HTTP-date
pub fn format_last_modified(modified: SystemTime) -> String {
    httpdate::fmt_http_date(modified)
}

/// True when the file has not changed since the client's `If-Modified-Since`
///
/// HTTP-dates carry whole seconds, so the modification time is truncated.
/// Unparseable dates never match.
pub fn not_modified_since(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(|v| httpdate::parse_http_date(v.trim()).ok())
    else {
        return false;
    };
    match (unix_secs(modified), unix_secs(since)) {
        (Some(modified), Some(since)) => modified <= since,
        _ => false,
    }
}

/// Evaluate conditional GET headers; `If-None-Match` takes precedence
pub fn is_not_modified(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    modified: Option<SystemTime>,
) -> bool {
    if if_none_match.is_some() {
        return check_etag_match(if_none_match, etag);
    }
    modified.is_some_and(|m| not_modified_since(if_modified_since, m))
}

fn unix_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_generate_etag() {
        let modified = UNIX_EPOCH + Duration::from_secs(784_111_777);
        let etag = generate_etag(11, Some(modified));
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(11, Some(modified)));
        assert_ne!(etag, generate_etag(12, Some(modified)));
        assert_ne!(
            etag,
            generate_etag(11, Some(modified + Duration::from_millis(1)))
        );
        assert_eq!(generate_etag(16, None), "\"10-0\"");
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_last_modified_round_trip() {
        let modified = UNIX_EPOCH + Duration::from_secs(784_111_777);
        let header = format_last_modified(modified);
        assert_eq!(header, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert!(not_modified_since(Some(&header), modified));
    }

    #[test]
    fn test_not_modified_since_ignores_subsecond() {
        let modified = UNIX_EPOCH + Duration::from_millis(784_111_777_450);
        assert!(not_modified_since(
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            modified
        ));
        assert!(!not_modified_since(
            Some("Sun, 06 Nov 1994 08:49:36 GMT"),
            modified
        ));
        assert!(!not_modified_since(Some("yesterday"), modified));
        assert!(!not_modified_since(None, modified));
    }

    #[test]
    fn test_if_none_match_takes_precedence() {
        let modified = UNIX_EPOCH + Duration::from_secs(784_111_777);
        let newer = "Mon, 07 Nov 1994 08:49:37 GMT";
        assert!(!is_not_modified(
            Some("\"other\""),
            Some(newer),
            "\"abc\"",
            Some(modified)
        ));
        assert!(is_not_modified(None, Some(newer), "\"abc\"", Some(modified)));
        assert!(!is_not_modified(None, Some(newer), "\"abc\"", None));
    }
}
