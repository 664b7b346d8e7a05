//! Request handler module
//!
//! Dispatches routed requests to the three file operations:
//! serve (GET), store (POST multipart upload) and delete (DELETE).

pub mod delete;
pub mod router;
pub mod static_files;
pub mod upload;

// Re-export main entry point
pub use router::handle_request;
