//! Live connector handle

use mongodb::options::WriteConcern;
use mongodb::{Client, Database};

/// Owner of the live MongoDB client.
///
/// Created once at scheduler startup by [`ConnectorBuilder`](super::ConnectorBuilder)
/// and torn down once by [`shutdown`](Self::shutdown), which consumes it.
/// The client is safe to share: callers obtain database handles through
/// [`select_database`](Self::select_database) from any task.
#[derive(Debug)]
pub struct Connector {
    client: Client,
    write_concern: Option<WriteConcern>,
    reused: bool,
}

impl Connector {
    pub(crate) fn new(client: Client, write_concern: Option<WriteConcern>) -> Self {
        Self {
            client,
            write_concern,
            reused: false,
        }
    }

    pub(crate) fn reuse(client: Client) -> Self {
        Self {
            client,
            write_concern: None,
            reused: true,
        }
    }

    /// Handle scoped to the named database
    pub fn select_database(&self, name: &str) -> Database {
        self.client.database(name)
    }

    /// Underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Write concern applied at construction.
    ///
    /// `None` for a reused external client: its write concern is the
    /// supplier's responsibility.
    pub fn write_concern(&self) -> Option<&WriteConcern> {
        self.write_concern.as_ref()
    }

    /// Whether this connector wraps an externally supplied client
    pub fn is_reused(&self) -> bool {
        self.reused
    }

    /// Release the client.
    ///
    /// Call once at teardown, after all scheduling activity has stopped.
    /// Consuming `self` makes a second call through this handle impossible;
    /// for a reused client, clones still held by the supplier are shut down
    /// with it, and using them afterwards is a caller contract violation.
    pub async fn shutdown(self) {
        tracing::info!(reused = self.reused, "shutting down connector");
        self.client.shutdown().await;
    }
}
