#![no_main]

use libfuzzer_sys::fuzz_target;
use quartz_mongo_connector::EndpointRef;

fuzz_target!(|data: &str| {
    if let Ok(endpoint) = EndpointRef::parse(data) {
        // A parsed endpoint must survive its own display form
        let reparsed = EndpointRef::parse(&endpoint.to_string()).expect("display form parses");
        assert_eq!(reparsed, endpoint);
    }
});
