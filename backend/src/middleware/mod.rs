//! Request middleware.
//!
//! Cross-cutting request lifecycle concerns: trace identifiers with access
//! logging, and CORS.

pub mod cors;
pub mod trace;

pub use cors::Cors;
pub use trace::Trace;
