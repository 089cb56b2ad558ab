//! Middleware components for the HTTP server

pub mod cors;
pub mod logging;
pub mod rate_limit;
pub mod security_headers;
