//! Metrics for connector construction
//!
//! Recorded through the `metrics` facade; install any recorder to collect
//! them. Nothing is recorded at steady state, only while building.

pub mod counters;
pub mod histograms;
pub mod labels;
