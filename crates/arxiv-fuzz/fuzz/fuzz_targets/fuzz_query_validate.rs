#![no_main]

use arxiv_mcp::validation::validate_query;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Accepted queries must always name at least one of the two selectors.
        if let Ok(params) = validate_query(raw) {
            assert!(params.search_query().is_some() || params.id_list().is_some());
        }
    }
});
