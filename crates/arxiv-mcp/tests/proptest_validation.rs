//! Property-based tests for the query validation engine.

use proptest::prelude::*;

use arxiv_mcp::ValidationError;
use arxiv_mcp::validation::{ParsedQuery, Token, tokenize, validate_arxiv_id, validate_query};

/// Modern identifiers with optional version.
fn arb_modern_id() -> impl Strategy<Value = String> {
    ("[0-9]{4}", "[0-9]{4,5}", proptest::option::of(1u32..20))
        .prop_map(|(yymm, num, v)| match v {
            Some(v) => format!("{yymm}.{num}v{v}"),
            None => format!("{yymm}.{num}"),
        })
}

/// Legacy identifiers with optional subject class and version.
fn arb_legacy_id() -> impl Strategy<Value = String> {
    (
        "[a-z][a-z-]{0,10}",
        proptest::option::of("[A-Z]{2}"),
        "[0-9]{7}",
        proptest::option::of(1u32..20),
    )
        .prop_map(|(archive, class, num, v)| {
            let mut id = archive;
            if let Some(class) = class {
                id.push('.');
                id.push_str(&class);
            }
            id.push('/');
            id.push_str(&num);
            if let Some(v) = v {
                id.push_str(&format!("v{v}"));
            }
            id
        })
}

proptest! {
    /// The engine never panics, whatever it is fed.
    #[test]
    fn validate_query_total(raw in ".{0,200}") {
        let _ = validate_query(&raw);
    }

    /// Well-formed identifiers always pass.
    #[test]
    fn generated_ids_accepted(modern in arb_modern_id(), legacy in arb_legacy_id()) {
        prop_assert_eq!(validate_arxiv_id(&modern), Ok(modern.clone()));
        prop_assert_eq!(validate_arxiv_id(&legacy), Ok(legacy.clone()));

        let raw = format!("id_list={modern},{legacy}");
        prop_assert!(validate_query(&raw).is_ok());
    }

    /// max_results accepts exactly 1..=2000.
    #[test]
    fn max_results_range(n in -5000i64..5000) {
        let result = validate_query(&format!("id_list=2301.00001&max_results={n}"));
        if (1..=2000).contains(&n) {
            let params = result.unwrap();
            prop_assert_eq!(params.max_results().map(i64::from), Some(n));
        } else {
            let is_out_of_range = matches!(result, Err(ValidationError::OutOfRange { .. }));
            prop_assert!(is_out_of_range);
        }
    }

    /// start accepts every non-negative integer.
    #[test]
    fn start_non_negative(n in 0u64..u64::from(u32::MAX)) {
        let params = validate_query(&format!("id_list=2301.00001&start={n}")).unwrap();
        prop_assert_eq!(params.start(), Some(n));
    }

    /// Any extra parameter name is reported once the known fields pass.
    #[test]
    fn unknown_names_reported(name in "[a-z]{3,12}") {
        prop_assume!(name != "start");
        let err = validate_query(&format!("id_list=2301.00001&{name}=1")).unwrap_err();
        prop_assert_eq!(err, ValidationError::UnknownParameter { names: vec![name] });
    }

    /// Tokenizing loses no characters.
    #[test]
    fn tokens_cover_input(query in "[a-zA-Z0-9_:()\" +-]{0,80}") {
        let rebuilt: String = tokenize(&query)
            .into_iter()
            .map(|token| match token {
                Token::Punctuation(c) => c.to_string(),
                Token::Prefix(word) | Token::Operator(word) | Token::Literal(word) => word.to_string(),
            })
            .collect();
        prop_assert_eq!(rebuilt, query);
    }

    /// The first occurrence of a repeated key wins.
    #[test]
    fn parser_first_value_wins(a in "[a-z]{1,10}", b in "[a-z]{1,10}") {
        let parsed = ParsedQuery::parse(&format!("k={a}&k={b}"));
        prop_assert_eq!(parsed.get("k"), Some(a.as_str()));
        prop_assert_eq!(parsed.len(), 1);
    }
}
