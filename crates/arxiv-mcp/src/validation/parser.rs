//! URL query-string splitting.

use url::form_urlencoded;

/// Query parameters keyed by name, first occurrence wins.
///
/// Names keep the order in which they first appeared so that diagnostics can
/// list them as the caller wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    entries: Vec<(String, String)>,
}

impl ParsedQuery {
    /// Decode a raw `key=value&key=value` string.
    ///
    /// Percent escapes and `+` are decoded as in HTML form encoding. Pairs with
    /// an empty value are dropped, and later duplicates of a name are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parsed = Self::default();
        for (name, value) in form_urlencoded::parse(raw.as_bytes()) {
            if value.is_empty() || parsed.contains(&name) {
                continue;
            }
            parsed.entries.push((name.into_owned(), value.into_owned()));
        }
        parsed
    }

    /// Value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Check whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Parameter names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Number of distinct parameter names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no parameters were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(ParsedQuery::parse("").is_empty());
    }

    #[test]
    fn test_first_value_wins() {
        let parsed = ParsedQuery::parse("start=5&start=10&max_results=3");
        assert_eq!(parsed.get("start"), Some("5"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let parsed = ParsedQuery::parse("search_query=ti:%22quantum+criticality%22");
        assert_eq!(parsed.get("search_query"), Some("ti:\"quantum criticality\""));
    }

    #[test]
    fn test_blank_values_dropped() {
        let parsed = ParsedQuery::parse("search_query=&id_list=2301.00001&flag");
        assert!(!parsed.contains("search_query"));
        assert!(!parsed.contains("flag"));
        assert_eq!(parsed.get("id_list"), Some("2301.00001"));
    }

    #[test]
    fn test_names_keep_first_seen_order() {
        let parsed = ParsedQuery::parse("zeta=1&alpha=2&zeta=3&mid=4");
        assert_eq!(parsed.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }
}
