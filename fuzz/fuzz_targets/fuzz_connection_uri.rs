#![no_main]

use libfuzzer_sys::fuzz_target;
use quartz_mongo_connector::client::{redact_uri, ConnectionUri};

fuzz_target!(|data: &str| {
    if let Ok(uri) = ConnectionUri::parse(data) {
        assert!(!uri.hosts.is_empty());
        let redacted = uri.redacted();
        if uri.user.is_some() && uri.has_password {
            assert!(redacted.contains(":****@"));
        }
    }
    let _ = redact_uri(data);
});
