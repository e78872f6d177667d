//! HTTP middleware stack: CORS and per-request trace ids.

pub mod cors;
pub mod trace;
