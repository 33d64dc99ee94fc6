//! Discrete-mode resolution of endpoints and credentials
//!
//! This module handles:
//! * `host[:port]` address parsing, order preserved
//! * Credential construction with explicit password validation

mod address;
mod credential;

pub use address::{resolve_addresses, EndpointRef, DEFAULT_PORT};
pub use credential::{resolve_credentials, Credential};
