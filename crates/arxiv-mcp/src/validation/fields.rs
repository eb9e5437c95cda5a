//! Per-parameter validators.
//!
//! Each function is pure: raw string in, typed value or [`ValidationError`] out.

use std::num::IntErrorKind;

use super::patterns::{
    MAX_RESULTS_LIMIT, SORT_BY_VALUES, SORT_ORDER_VALUES, SUBMITTED_DATE_RANGE, ascii_digit,
    is_arxiv_id,
};
use crate::error::ValidationError;
use crate::models::{SortBy, SortOrder};

const START_RANGE: &str = "must be non-negative";
const MAX_RESULTS_RANGE: &str = "must be between 1 and 2000 (arXiv API limit)";

/// Validate a comma-separated `id_list`, returning it unchanged.
pub fn validate_id_list(id_list: &str) -> Result<String, ValidationError> {
    for member in id_list.split(',') {
        validate_arxiv_id(member)?;
    }
    Ok(id_list.to_string())
}

/// Validate a single arXiv identifier, returning it without surrounding whitespace.
pub fn validate_arxiv_id(id: &str) -> Result<String, ValidationError> {
    let id = trim_blank(id);
    if id.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if !is_arxiv_id(id) {
        return Err(ValidationError::MalformedIdentifier { id: id.to_string() });
    }
    Ok(id.to_string())
}

/// Validate the `start` offset.
///
/// Offsets past `u64::MAX` saturate; only negative values are out of range.
pub fn validate_start(value: &str) -> Result<u64, ValidationError> {
    let digits = normalize_integer(value)
        .ok_or_else(|| ValidationError::MalformedInteger { param: "start", value: value.to_string() })?;

    if let Some(magnitude) = digits.strip_prefix('-') {
        if magnitude.bytes().all(|b| b == b'0') {
            return Ok(0);
        }
        return Err(ValidationError::OutOfRange {
            param: "start",
            value: value.to_string(),
            constraint: START_RANGE,
        });
    }

    match digits.parse::<u64>() {
        Ok(start) => Ok(start),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(u64::MAX),
        Err(_) => Err(ValidationError::MalformedInteger { param: "start", value: value.to_string() }),
    }
}

/// Validate `max_results` against the API ceiling.
pub fn validate_max_results(value: &str) -> Result<u32, ValidationError> {
    let out_of_range = || ValidationError::OutOfRange {
        param: "max_results",
        value: value.to_string(),
        constraint: MAX_RESULTS_RANGE,
    };

    let digits = normalize_integer(value).ok_or_else(|| ValidationError::MalformedInteger {
        param: "max_results",
        value: value.to_string(),
    })?;
    // Only overflow is possible once the digits are normalized.
    let max_results = digits.parse::<i64>().map_err(|_| out_of_range())?;

    u32::try_from(max_results)
        .ok()
        .filter(|n| (1..=MAX_RESULTS_LIMIT).contains(n))
        .ok_or_else(out_of_range)
}

/// Validate `sortBy`.
pub fn validate_sort_by(value: &str) -> Result<SortBy, ValidationError> {
    SortBy::from_param(value).ok_or_else(|| ValidationError::InvalidEnumValue {
        param: "sortBy",
        value: value.to_string(),
        allowed: SORT_BY_VALUES,
    })
}

/// Validate `sortOrder`.
pub fn validate_sort_order(value: &str) -> Result<SortOrder, ValidationError> {
    SortOrder::from_param(value).ok_or_else(|| ValidationError::InvalidEnumValue {
        param: "sortOrder",
        value: value.to_string(),
        allowed: SORT_ORDER_VALUES,
    })
}

/// Validate a `submittedDate:[start+TO+end]` range, returning it unchanged.
///
/// Timestamps are fixed-width `YYYYMMDDTTTT`, so string order is time order.
pub fn validate_submitted_date(range: &str) -> Result<String, ValidationError> {
    let captures = SUBMITTED_DATE_RANGE
        .captures(range)
        .ok_or_else(|| ValidationError::InvalidDateRange { value: range.to_string() })?;

    let (start, end) = (&captures[1], &captures[2]);
    if start >= end {
        return Err(ValidationError::DateRangeOrder {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(range.to_string())
}

/// Strip whitespace plus the ASCII information separators `\x1c`..=`\x1f`.
fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

/// Rewrite an integer literal as an optional `-` followed by ASCII digits.
///
/// Accepts surrounding blanks, one leading sign, decimal digits from any
/// script, and single underscores between digits.
fn normalize_integer(value: &str) -> Option<String> {
    let value = trim_blank(value);
    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let mut digits = String::with_capacity(body.len() + 1);
    if negative {
        digits.push('-');
    }

    let mut after_digit = false;
    for c in body.chars() {
        if c == '_' {
            if !after_digit {
                return None;
            }
            after_digit = false;
            continue;
        }
        digits.push(ascii_digit(c)?);
        after_digit = true;
    }

    after_digit.then_some(digits)
}
