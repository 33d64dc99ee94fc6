//! Counter helpers

use super::labels;

/// Record a finished build attempt
pub fn build_completed(source: &'static str, outcome: &'static str) {
    metrics::counter!(
        labels::CONNECTOR_BUILDS_TOTAL,
        "source" => source,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a build failure by error category
pub fn build_failed(category: &'static str) {
    metrics::counter!(labels::CONNECTOR_BUILD_ERRORS_TOTAL, "category" => category).increment(1);
}

/// Record a trust or key store load
pub fn store_loaded(role: &'static str, outcome: &'static str) {
    metrics::counter!(
        labels::STORE_LOADS_TOTAL,
        "role" => role,
        "outcome" => outcome
    )
    .increment(1);
}
