//! Histogram helpers

use super::labels;
use std::time::Duration;

/// Record how long a successful build took
pub fn build_duration(source: &'static str, duration: Duration) {
    metrics::histogram!(labels::CONNECTOR_BUILD_DURATION_MS, "source" => source)
        .record(duration.as_secs_f64() * 1000.0);
}
