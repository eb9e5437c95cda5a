//! Tokenizer and checks for the `search_query` mini-language.
//!
//! The checks are syntactic only: parentheses, operands and precedence are
//! left to the API.

use super::patterns::{BOOLEAN_OPERATORS, FIELD_PREFIXES, WORD, is_field_prefix};
use crate::error::ValidationError;

/// One lexical unit of a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A word directly followed by `:` (the colon is not part of the token).
    Prefix(&'a str),
    /// A whole word spelled exactly `AND`, `OR` or `ANDNOT`.
    Operator(&'a str),
    /// Any other word.
    Literal(&'a str),
    /// A single non-word character, whitespace included.
    Punctuation(char),
}

impl<'a> Token<'a> {
    /// Text of a word token, `None` for punctuation.
    #[must_use]
    pub const fn word(self) -> Option<&'a str> {
        match self {
            Self::Prefix(word) | Self::Operator(word) | Self::Literal(word) => Some(word),
            Self::Punctuation(_) => None,
        }
    }
}

/// Split a query into words and single punctuation characters.
#[must_use]
pub fn tokenize(query: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for word in WORD.find_iter(query) {
        tokens.extend(query[cursor..word.start()].chars().map(Token::Punctuation));

        let text = word.as_str();
        let token = if query[word.end()..].starts_with(':') {
            Token::Prefix(text)
        } else if BOOLEAN_OPERATORS.contains(&text) {
            Token::Operator(text)
        } else {
            Token::Literal(text)
        };
        tokens.push(token);
        cursor = word.end();
    }

    tokens.extend(query[cursor..].chars().map(Token::Punctuation));
    tokens
}

/// Validate a `search_query` value, returning it unchanged.
///
/// Every `prefix:` must name a known field. An operator mentioned anywhere in
/// the query, in any letter case and even inside a longer word, must also
/// appear at least once in upper case between two spaces or two `+` signs.
pub fn validate_search_query(query: &str) -> Result<String, ValidationError> {
    let tokens = tokenize(query);

    if let Some(prefix) = tokens.iter().find_map(|token| match token {
        Token::Prefix(word) if !is_field_prefix(word) => Some(*word),
        _ => None,
    }) {
        return Err(ValidationError::UnknownFieldPrefix {
            prefix: prefix.to_string(),
            allowed: FIELD_PREFIXES,
        });
    }

    for &operator in BOOLEAN_OPERATORS {
        if mentions(&tokens, operator) && !is_flanked(&tokens, operator) {
            return Err(ValidationError::MalformedBooleanOperator { operator });
        }
    }

    Ok(query.to_string())
}

fn mentions(tokens: &[Token<'_>], operator: &str) -> bool {
    tokens
        .iter()
        .filter_map(|token| token.word())
        .any(|word| word.to_uppercase().contains(operator))
}

fn is_flanked(tokens: &[Token<'_>], operator: &str) -> bool {
    tokens.windows(3).any(|window| match window {
        [Token::Punctuation(left), Token::Operator(op), Token::Punctuation(right)] => {
            *op == operator && left == right && matches!(left, ' ' | '+')
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_tags_prefixes_and_operators() {
        let tokens = tokenize("au:del_maestro AND ti:checkerboard");
        assert_eq!(
            tokens,
            vec![
                Token::Prefix("au"),
                Token::Punctuation(':'),
                Token::Literal("del_maestro"),
                Token::Punctuation(' '),
                Token::Operator("AND"),
                Token::Punctuation(' '),
                Token::Prefix("ti"),
                Token::Punctuation(':'),
                Token::Literal("checkerboard"),
            ]
        );
    }

    #[test]
    fn test_tokenize_lowercase_operator_is_literal() {
        assert_eq!(
            tokenize("a and b"),
            vec![
                Token::Literal("a"),
                Token::Punctuation(' '),
                Token::Literal("and"),
                Token::Punctuation(' '),
                Token::Literal("b"),
            ]
        );
    }

    #[test]
    fn test_combining_mark_splits_words() {
        assert_eq!(
            tokenize("\u{915}\u{93F}ti:x"),
            vec![
                Token::Literal("\u{915}"),
                Token::Punctuation('\u{93F}'),
                Token::Prefix("ti"),
                Token::Punctuation(':'),
                Token::Literal("x"),
            ]
        );
        assert!(validate_search_query("\u{915}\u{93F}ti:x").is_ok());
        assert!(validate_search_query("\u{915}\u{93F}:x").is_ok());
    }

    #[test]
    fn test_valid_prefixes_pass() {
        for query in ["ti:quantum", "cat:cond-mat.mes-hall", "all:electron", "jr:nature"] {
            assert_eq!(validate_search_query(query).unwrap(), query);
        }
    }

    #[test]
    fn test_unknown_prefix_named() {
        let err = validate_search_query("title:quantum").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownFieldPrefix {
                prefix: "title".to_string(),
                allowed: FIELD_PREFIXES,
            }
        );
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        assert!(validate_search_query("TI:quantum").is_err());
    }

    #[test]
    fn test_chained_colons_check_every_prefix() {
        assert!(validate_search_query("ti:au:x").is_ok());
        assert!(validate_search_query("ti:foo:bar").is_err());
    }

    #[test]
    fn test_operator_with_spaces_or_plus() {
        assert!(validate_search_query("au:einstein AND ti:relativity").is_ok());
        assert!(validate_search_query("au:einstein+AND+ti:relativity").is_ok());
        assert!(validate_search_query("au:bohr OR au:heisenberg").is_ok());
    }

    #[test]
    fn test_operator_without_flanking_rejected() {
        let err = validate_search_query("au:einstein(AND)ti:relativity").unwrap_err();
        assert_eq!(err, ValidationError::MalformedBooleanOperator { operator: "AND" });
    }

    #[test]
    fn test_mixed_flanking_rejected() {
        assert!(validate_search_query("au:einstein AND+ti:relativity").is_err());
    }

    #[test]
    fn test_lowercase_operator_needs_uppercase_form() {
        let err = validate_search_query("au:einstein and ti:relativity").unwrap_err();
        assert_eq!(err, ValidationError::MalformedBooleanOperator { operator: "AND" });
    }

    #[test]
    fn test_operator_inside_word_is_mentioned() {
        // "information" contains OR once uppercased
        let err = validate_search_query("ti:information").unwrap_err();
        assert_eq!(err, ValidationError::MalformedBooleanOperator { operator: "OR" });

        assert!(validate_search_query("ti:information OR ti:entropy").is_ok());
    }

    #[test]
    fn test_andnot_alone_trips_and_check() {
        let err = validate_search_query("ti:quantum ANDNOT au:smith").unwrap_err();
        assert_eq!(err, ValidationError::MalformedBooleanOperator { operator: "AND" });
    }
}
