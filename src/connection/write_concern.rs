//! Durable write concern

use mongodb::options::{Acknowledgment, WriteConcern};
use std::time::Duration;

/// Write acknowledgment policy applied to every constructed client.
///
/// Locks, updates and check-ins must reach a majority of the replica set
/// and its on-disk journal, so the scheduler state survives a primary
/// failover. The policy has no weaker variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteConcernPolicy {
    timeout: Duration,
}

impl WriteConcernPolicy {
    /// Durable policy with the given acknowledgment timeout
    pub fn durable(timeout_millis: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_millis),
        }
    }

    /// Acknowledgment timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Driver write concern: majority, timeout, journal
    pub fn to_write_concern(&self) -> WriteConcern {
        let mut concern = WriteConcern::default();
        concern.w = Some(Acknowledgment::Majority);
        concern.w_timeout = Some(self.timeout);
        concern.journal = Some(true);
        concern
    }

    /// Whether `concern` is exactly this policy
    pub fn matches(&self, concern: &WriteConcern) -> bool {
        *concern == self.to_write_concern()
    }
}
