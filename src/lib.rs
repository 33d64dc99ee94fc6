//! MongoDB connector for job scheduler persistence.
//!
//! Builds a validated, optionally TLS-secured, authenticated connection to a
//! replicated MongoDB cluster and hands the scheduler store a [`Connector`]
//! owning the live client.
//!
//! # Connection sources
//!
//! Exactly one source is active per configuration:
//!
//! * an externally supplied [`mongodb::Client`], reused as-is
//! * a connection URI (`mongodb://` or `mongodb+srv://`)
//! * a list of `host[:port]` addresses plus discrete credentials
//!
//! Every client constructed here (URI or addresses) carries a durable write
//! concern: majority acknowledgment, the configured timeout and journaling.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> quartz_mongo_connector::Result<()> {
//! use quartz_mongo_connector::{ConnectionConfig, ConnectorBuilder};
//!
//! let config = ConnectionConfig::builder("quartz")
//!     .addresses(["db1.internal:27017", "db2.internal:27017"])
//!     .credentials("scheduler", "secret")
//!     .auth_db_name("admin")
//!     .write_timeout_millis(10_000)
//!     .build();
//!
//! let connector = ConnectorBuilder::build(config).await?;
//! let jobs = connector.select_database("quartz");
//! # let _ = jobs;
//! connector.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod metrics;
pub mod resolve;

pub use config::{ConnectionConfig, ConnectionConfigBuilder, StoreConfig, StoreType, TransportTuning};
pub use connection::{
    ClientSetup, ConnectionSource, Connector, ConnectorBuilder, TlsContext, WriteConcernPolicy,
};
pub use error::{Error, Result};
pub use resolve::{Credential, EndpointRef};
