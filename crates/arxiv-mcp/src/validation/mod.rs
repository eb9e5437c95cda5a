//! Pre-flight validation of arXiv query strings.
//!
//! The query API accepts six top-level parameters. This module checks a raw
//! `key=value&...` string against that grammar before anything goes over the
//! network:
//!
//! 1. At least one of `search_query` / `id_list` must be present.
//! 2. Each recognized parameter is validated in a fixed order; the first
//!    failure is returned.
//! 3. Any other parameter name is rejected.
//!
//! Validation is synchronous and allocation-light, with no shared mutable
//! state, so it can be called from any thread or task.
//!
//! # Example
//!
//! ```
//! use arxiv_mcp::validation::validate_query;
//!
//! let params = validate_query("search_query=ti:quantum&max_results=5").unwrap();
//! assert_eq!(params.search_query(), Some("ti:quantum"));
//! assert_eq!(params.max_results(), Some(5));
//!
//! assert!(validate_query("search_query=au:einstein&foo=bar").is_err());
//! ```

mod fields;
mod parser;
pub mod patterns;
mod search_query;

pub use fields::{
    validate_arxiv_id, validate_id_list, validate_max_results, validate_sort_by,
    validate_sort_order, validate_start, validate_submitted_date,
};
pub use parser::ParsedQuery;
pub use search_query::{Token, tokenize, validate_search_query};

use serde::Serialize;

use crate::error::ValidationError;
use crate::models::{SortBy, SortOrder};
use patterns::is_recognized_param;

/// Parameters that passed validation.
///
/// Always holds `search_query`, `id_list`, or both. Serializes to a JSON
/// object keyed by the API's parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
    #[serde(rename = "sortBy", skip_serializing_if = "Option::is_none")]
    sort_by: Option<SortBy>,
    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    sort_order: Option<SortOrder>,
}

impl ValidatedParams {
    const fn empty() -> Self {
        Self {
            search_query: None,
            id_list: None,
            start: None,
            max_results: None,
            sort_by: None,
            sort_order: None,
        }
    }

    /// The `search_query` expression, unchanged.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    /// The `id_list` value, unchanged.
    #[must_use]
    pub fn id_list(&self) -> Option<&str> {
        self.id_list.as_deref()
    }

    /// Individual identifiers from `id_list`, trimmed.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.id_list.iter().flat_map(|list| list.split(',')).map(str::trim)
    }

    /// Result offset.
    #[must_use]
    pub const fn start(&self) -> Option<u64> {
        self.start
    }

    /// Page size.
    #[must_use]
    pub const fn max_results(&self) -> Option<u32> {
        self.max_results
    }

    /// Sort key.
    #[must_use]
    pub const fn sort_by(&self) -> Option<SortBy> {
        self.sort_by
    }

    /// Sort direction.
    #[must_use]
    pub const fn sort_order(&self) -> Option<SortOrder> {
        self.sort_order
    }

    /// Names of the parameters present, in validation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let present = [
            self.search_query.is_some(),
            self.id_list.is_some(),
            self.start.is_some(),
            self.max_results.is_some(),
            self.sort_by.is_some(),
            self.sort_order.is_some(),
        ];
        patterns::RECOGNIZED_PARAMS
            .iter()
            .zip(present)
            .filter_map(|(name, is_present)| is_present.then_some(*name))
            .collect()
    }
}

/// Parse and validate a raw query string.
pub fn validate_query(raw: &str) -> Result<ValidatedParams, ValidationError> {
    validate_parsed(&ParsedQuery::parse(raw))
}

/// Validate an already-split query. Fails on the first broken rule.
pub fn validate_parsed(parsed: &ParsedQuery) -> Result<ValidatedParams, ValidationError> {
    if !parsed.contains("search_query") && !parsed.contains("id_list") {
        return Err(ValidationError::MissingRequired);
    }

    let mut params = ValidatedParams::empty();

    if let Some(value) = parsed.get("search_query") {
        params.search_query = Some(validate_search_query(value)?);
    }
    if let Some(value) = parsed.get("id_list") {
        params.id_list = Some(validate_id_list(value)?);
    }
    if let Some(value) = parsed.get("start") {
        params.start = Some(validate_start(value)?);
    }
    if let Some(value) = parsed.get("max_results") {
        params.max_results = Some(validate_max_results(value)?);
    }
    if let Some(value) = parsed.get("sortBy") {
        params.sort_by = Some(validate_sort_by(value)?);
    }
    if let Some(value) = parsed.get("sortOrder") {
        params.sort_order = Some(validate_sort_order(value)?);
    }

    let unknown: Vec<String> = parsed
        .names()
        .filter(|name| !is_recognized_param(name))
        .map(str::to_string)
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownParameter { names: unknown });
    }

    Ok(params)
}
