//! API middleware.
//!
//! Execution order (outermost → innermost):
//! 1. Cache-Control header (tower-http)
//! 2. Request logger — method, path, status, latency

pub mod request_log;
