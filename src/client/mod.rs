//! Connection URI handling

mod connection_string;

pub use connection_string::{redact_uri, ConnectionUri, UriScheme};
