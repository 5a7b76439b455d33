//! HTTP middleware stack for the catalog server.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added by the binary)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill in the span field, echo the header)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
