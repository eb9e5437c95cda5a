#![no_main]

use arxiv_mcp::models::{DownloadPaperInput, GetImageInput, SendQueryInput};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<SendQueryInput>(data);
    let _ = serde_json::from_slice::<DownloadPaperInput>(data);
    let _ = serde_json::from_slice::<GetImageInput>(data);
});
