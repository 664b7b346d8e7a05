//! Routing module
//!
//! Method dispatch over a small fixed route table:
//! - Catch-all wildcard path patterns with one captured parameter
//! - Resolution into matched handler, 405 with the allowed methods, or 404

mod matcher;
mod table;

pub use matcher::{allow_header, resolve, RouteOutcome};
pub use table::{HandlerKind, RouteTable};
