//! Fuzzing library for arxiv-mcp.
//!
//! This crate provides fuzzing targets for the query validation engine and
//! the tool input models.
//!
//! # Usage
//!
//! ```bash
//! cd crates/arxiv-fuzz
//! cargo +nightly fuzz run fuzz_query_validate -- -max_total_time=60
//! ```

pub use arxiv_mcp::{models, validation};
