#![no_main]

use arxiv_mcp::validation::{Token, tokenize, validate_search_query};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|query: &str| {
    let rebuilt: String = tokenize(query)
        .into_iter()
        .map(|token| match token {
            Token::Punctuation(c) => c.to_string(),
            Token::Prefix(word) | Token::Operator(word) | Token::Literal(word) => word.to_string(),
        })
        .collect();
    assert_eq!(rebuilt, query);

    if let Ok(accepted) = validate_search_query(query) {
        assert_eq!(accepted, query);
    }
});
