//! HTTP middleware stack for the API server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (only when origins are configured)
//!
//! Caller identity is resolved per handler by the [`CurrentAccount`]
//! extractor rather than by a layer.

pub mod identity;
pub mod request_id;

pub use identity::{CurrentAccount, IDENTITY_HEADER};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
