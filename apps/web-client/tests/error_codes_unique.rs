use std::collections::HashSet;

use web_client::ErrorCode;

#[test]
fn error_codes_are_unique() {
    let mut seen = HashSet::new();
    for code in ErrorCode::ALL {
        assert!(seen.insert(code.as_str()), "duplicate code {code}");
    }
    assert_eq!(seen.len(), ErrorCode::ALL.len());
}

#[test]
fn error_codes_are_screaming_snake_case() {
    for code in ErrorCode::ALL {
        let s = code.as_str();
        assert!(
            s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
            "{s} is not SCREAMING_SNAKE_CASE"
        );
        assert!(!s.starts_with('_') && !s.ends_with('_'), "{s}");
    }
}
