//! Keyword suggestions and their ranking.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A suggested completion term with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested term or phrase, in its original case.
    pub term: String,
    /// Relevance score; higher is better.
    pub score: f32,
}

impl Suggestion {
    /// Creates a new suggestion.
    pub fn new(term: impl Into<String>, score: f32) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }

    /// Returns the term used for duplicate detection.
    pub fn dedup_key(&self) -> String {
        self.term.to_lowercase()
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.term, self.score)
    }
}

/// Orders suggestions by descending score.
pub fn compare(a: &Suggestion, b: &Suggestion) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Sorts suggestions by descending score, keeping insertion order on ties.
pub fn sort_suggestions(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(compare);
}

/// Removes case-insensitive duplicates, keeping the first occurrence of each term.
pub fn dedup_suggestions(suggestions: &mut Vec<Suggestion>) {
    let mut seen = HashSet::new();
    suggestions.retain(|s| seen.insert(s.dedup_key()));
}

/// Sorts and then deduplicates, so the highest-scored spelling of each term survives.
pub fn rank_suggestions(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    sort_suggestions(&mut suggestions);
    dedup_suggestions(&mut suggestions);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_descending() {
        let low = Suggestion::new("a", 1.0);
        let high = Suggestion::new("b", 2.0);
        assert_eq!(compare(&high, &low), Ordering::Less);
        assert_eq!(compare(&low, &high), Ordering::Greater);
        assert_eq!(compare(&low, &low), Ordering::Equal);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut suggestions = vec![
            Suggestion::new("first", 1.0),
            Suggestion::new("top", 3.0),
            Suggestion::new("second", 1.0),
        ];
        sort_suggestions(&mut suggestions);
        let terms: Vec<_> = suggestions.iter().map(|s| s.term.as_str()).collect();
        assert_eq!(terms, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_dedup_is_case_insensitive() {
        let mut suggestions = vec![
            Suggestion::new("Aspirin", 2.0),
            Suggestion::new("aspirin", 1.0),
            Suggestion::new("ASPIRIN", 0.5),
            Suggestion::new("ibuprofen", 0.5),
        ];
        dedup_suggestions(&mut suggestions);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].term, "Aspirin");
        assert_eq!(suggestions[1].term, "ibuprofen");
    }

    #[test]
    fn test_rank_keeps_highest_scored_spelling() {
        let ranked = rank_suggestions(vec![
            Suggestion::new("aspirin", 1.0),
            Suggestion::new("Aspirin", 5.0),
            Suggestion::new("tylenol", 2.0),
        ]);
        assert_eq!(
            ranked,
            vec![Suggestion::new("Aspirin", 5.0), Suggestion::new("tylenol", 2.0)]
        );
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
