//! Error types for connector construction

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Connector construction error.
///
/// Every variant is a configuration error: it is raised synchronously while
/// building a [`Connector`](crate::Connector), is never retried, and is fatal
/// to scheduler startup.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither a URI nor any address was configured
    #[error("at least one address or a URI must be specified")]
    MissingSource,

    /// An external client was supplied together with connection parameters
    #[error("configure either a client or connection parameters, not both")]
    ConflictingSource,

    /// A username was configured without a password
    #[error("password is required for user '{username}'")]
    MissingPassword {
        /// Username that lacked a password
        username: String,
    },

    /// An address entry could not be parsed
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress {
        /// Offending address as configured
        address: String,
        /// Why it was rejected
        reason: String,
    },

    /// Store container type is not supported
    #[error("unsupported store type '{0}': expected pem or pkcs12")]
    UnsupportedStoreType(String),

    /// Trust or key store could not be loaded
    #[error("cannot load store '{}': {reason}", path.display())]
    Store {
        /// Store file path
        path: PathBuf,
        /// What went wrong
        reason: String,
        /// Underlying I/O failure, if any
        #[source]
        source: Option<io::Error>,
    },

    /// TLS context could not be assembled from the loaded material
    #[error("cannot set up TLS context: {reason}")]
    Tls {
        /// What went wrong
        reason: String,
        /// Underlying rustls failure, if any
        #[source]
        source: Option<rustls::Error>,
    },

    /// Connection URI was rejected by the driver
    #[error("invalid connection URI: {0}")]
    Uri(#[source] mongodb::error::Error),

    /// Driver failed to construct or reach the client
    #[error("{context}: {source}")]
    Driver {
        /// Step that failed
        context: &'static str,
        /// Driver error
        #[source]
        source: mongodb::error::Error,
    },

    /// Other invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this is a configuration error.
    ///
    /// Always true: the connector has a single error kind. Kept so callers
    /// mapping into a wider scheduler error can branch on it explicitly.
    pub fn is_config(&self) -> bool {
        true
    }

    /// Short category label, used for metrics
    pub fn category(&self) -> &'static str {
        match self {
            Error::MissingSource => "missing_source",
            Error::ConflictingSource => "conflicting_source",
            Error::MissingPassword { .. } => "missing_password",
            Error::InvalidAddress { .. } => "invalid_address",
            Error::UnsupportedStoreType(_) => "unsupported_store_type",
            Error::Store { .. } => "store",
            Error::Tls { .. } => "tls",
            Error::Uri(_) => "uri",
            Error::Driver { .. } => "driver",
            Error::Config(_) => "config",
        }
    }

    pub(crate) fn store(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Store {
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn tls(reason: impl Into<String>, source: rustls::Error) -> Self {
        Error::Tls {
            reason: reason.into(),
            source: Some(source),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::ConflictingSource.to_string(),
            "configure either a client or connection parameters, not both"
        );
        assert_eq!(
            Error::MissingSource.to_string(),
            "at least one address or a URI must be specified"
        );
        let err = Error::MissingPassword {
            username: "u".into(),
        };
        assert_eq!(err.to_string(), "password is required for user 'u'");
    }

    #[test]
    fn test_store_error_keeps_source() {
        let err = Error::Store {
            path: "/nonexistent".into(),
            reason: "read failed".into(),
            source: Some(io::Error::new(io::ErrorKind::NotFound, "gone")),
        };
        assert!(err.to_string().contains("/nonexistent"));
        assert!(err.source().is_some());
        assert_eq!(err.category(), "store");
    }

    #[test]
    fn test_every_error_is_config() {
        assert!(Error::MissingSource.is_config());
        assert!(Error::Config("x".into()).is_config());
        assert!(Error::UnsupportedStoreType("jks".into()).is_config());
    }
}
