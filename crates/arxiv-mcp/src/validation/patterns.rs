//! Vocabulary of the arXiv query grammar.
//!
//! Every table here is read-only for the life of the process. Sets that are
//! rendered into error messages are stored sorted.

use std::sync::LazyLock;

use regex::Regex;

/// The only top-level parameters the query API accepts, in validation order.
pub const RECOGNIZED_PARAMS: &[&str] =
    &["search_query", "id_list", "start", "max_results", "sortBy", "sortOrder"];

/// Field prefixes usable as `prefix:term` inside `search_query`.
pub const FIELD_PREFIXES: &[&str] = &["abs", "all", "au", "cat", "co", "id", "jr", "rn", "ti"];

/// Boolean operators, in the order they are checked.
pub const BOOLEAN_OPERATORS: &[&str] = &["AND", "OR", "ANDNOT"];

/// Accepted `sortBy` values.
pub const SORT_BY_VALUES: &[&str] = &["lastUpdatedDate", "relevance", "submittedDate"];

/// Accepted `sortOrder` values.
pub const SORT_ORDER_VALUES: &[&str] = &["ascending", "descending"];

/// Upper bound the API documents for `max_results`.
pub const MAX_RESULTS_LIMIT: u32 = 2000;

/// Pre-2007 identifiers, e.g. `math.GT/0309136v1`.
pub static LEGACY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z-]+(\.[A-Z]{2})?/\d{7}(v\d+)?$").expect("valid legacy arXiv id pattern")
});

/// Current identifiers, e.g. `2301.00001v1`.
pub static MODERN_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}\.\d{4,5}(v\d+)?$").expect("valid modern arXiv id pattern")
});

/// `[YYYYMMDDTTTT+TO+YYYYMMDDTTTT]`
pub static SUBMITTED_DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{12})\+TO\+(\d{12})\]$").expect("valid submittedDate range pattern")
});

/// Runs of letters, numbers and `_`; combining marks are not word characters.
pub static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("valid word pattern"));

/// A single character from any script's decimal digit set.
static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}$").expect("valid decimal digit pattern"));

/// Check whether `c` is a decimal digit in any script.
#[must_use]
pub fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// ASCII value of a decimal digit from any script.
///
/// Unicode lays out every decimal set as ten contiguous code points starting at
/// zero, so the offset from the start of the run gives the value.
#[must_use]
pub fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let code = u32::from(c);
    let mut zero = code;
    while zero > 0 && char::from_u32(zero - 1).is_some_and(is_decimal_digit) {
        zero -= 1;
    }
    char::from_digit((code - zero) % 10, 10)
}

/// Check whether `name` is one of the six top-level parameters.
#[must_use]
pub fn is_recognized_param(name: &str) -> bool {
    RECOGNIZED_PARAMS.contains(&name)
}

/// Check whether `prefix` is a known search field.
#[must_use]
pub fn is_field_prefix(prefix: &str) -> bool {
    FIELD_PREFIXES.binary_search(&prefix).is_ok()
}

/// Check whether `id` has either arXiv identifier shape.
#[must_use]
pub fn is_arxiv_id(id: &str) -> bool {
    MODERN_ID.is_match(id) || LEGACY_ID.is_match(id)
}
