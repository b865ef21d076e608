//! Ranking assertions.

use std::collections::HashSet;

use helios_fulltext::Suggestion;

/// Asserts scores never increase along the list.
pub fn assert_non_increasing(suggestions: &[Suggestion]) {
    for pair in suggestions.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "Scores out of order: {} before {}",
            pair[0],
            pair[1]
        );
    }
}

/// Asserts no two suggestions differ only by case.
pub fn assert_unique_terms(suggestions: &[Suggestion]) {
    let mut seen = HashSet::new();
    for suggestion in suggestions {
        assert!(
            seen.insert(suggestion.term.to_lowercase()),
            "Duplicate suggestion term: {}",
            suggestion.term
        );
    }
}

/// Returns the suggested terms in order.
pub fn terms(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.term.as_str()).collect()
}
