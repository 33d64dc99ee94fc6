//! Build state machine

use crate::{Error, Result};

/// Connector build state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Configuration not yet validated
    Unvalidated,

    /// Wrapping an externally supplied client
    ReuseExternalClient,

    /// Constructing a new client from URI or addresses
    InitializeNew,

    /// Connector ready
    Constructed,

    /// Build failed; terminal
    Failed,
}

impl BuildState {
    /// Check if transition is valid
    pub fn can_transition_to(&self, next: BuildState) -> bool {
        use BuildState::*;

        matches!(
            (self, next),
            (Unvalidated, ReuseExternalClient)
                | (Unvalidated, InitializeNew)
                | (ReuseExternalClient, Constructed)
                | (InitializeNew, Constructed)
                | (Unvalidated, Failed)
                | (ReuseExternalClient, Failed)
                | (InitializeNew, Failed)
        )
    }

    /// Transition to new state
    pub fn transition(&mut self, next: BuildState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(Error::Config(format!(
                "invalid build transition from {:?} to {:?}",
                self, next
            )));
        }
        tracing::debug!(from = ?self, to = ?next, "build state transition");
        *self = next;
        Ok(())
    }

    /// Whether the build has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Constructed | BuildState::Failed)
    }
}
