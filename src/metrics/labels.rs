//! Metric names and label values

/// Build attempts, labelled by source and outcome
pub const CONNECTOR_BUILDS_TOTAL: &str = "quartz_mongo_connector_builds_total";
/// Build failures, labelled by error category
pub const CONNECTOR_BUILD_ERRORS_TOTAL: &str = "quartz_mongo_connector_build_errors_total";
/// Store loads, labelled by role and outcome
pub const STORE_LOADS_TOTAL: &str = "quartz_mongo_connector_store_loads_total";
/// Build duration in milliseconds
pub const CONNECTOR_BUILD_DURATION_MS: &str = "quartz_mongo_connector_build_duration_ms";

/// Connection source: externally supplied client
pub const SOURCE_EXTERNAL: &str = "external";
/// Connection source: URI
pub const SOURCE_URI: &str = "uri";
/// Connection source: discrete addresses
pub const SOURCE_ADDRESSES: &str = "addresses";
/// Connection source not determined (validation failed)
pub const SOURCE_UNKNOWN: &str = "unknown";

/// Store role: trust material
pub const STORE_TRUST: &str = "trust";
/// Store role: key material
pub const STORE_KEY: &str = "key";

/// Success outcome
pub const OUTCOME_OK: &str = "ok";
/// Failure outcome
pub const OUTCOME_ERROR: &str = "error";
