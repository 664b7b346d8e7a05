//! HTTP protocol layer module
//!
//! Protocol helpers shared by the file handlers: response builders,
//! cache validators, byte ranges and content types.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, RangeParseResult};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_ok_response, build_text_response, full_body, ResponseBody,
};
