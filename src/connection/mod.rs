//! Connector construction and lifecycle
//!
//! This module handles:
//! * Validation of mutually exclusive connection sources
//! * TLS context assembly from PEM and PKCS#12 trust and key stores
//! * Client option assembly and construction
//! * Durable write concern enforcement
//! * Connector ownership and shutdown

mod builder;
mod connector;
mod state;
mod tls;
mod write_concern;

pub use builder::{ClientSetup, ConnectionSource, ConnectorBuilder};
pub use connector::Connector;
pub use state::BuildState;
pub use tls::{build_context, load_store, LoadedStore, StoreRole, TlsContext};
pub use write_concern::WriteConcernPolicy;
