//! Token-group highlighting.
//!
//! The [`Highlighter`] walks an analyzed token stream, merges tokens whose
//! offsets overlap into groups, scores every group with a [`QueryScorer`], and
//! reports each group's span of the original text to a callback. The suggestion
//! engine uses the callback to harvest completion candidates.

use std::collections::HashMap;

use crate::analysis::Token;
use crate::core::TextIndex;
use crate::error::{FulltextError, FulltextResult, IndexResult};
use crate::query::PhraseQuery;

/// Most tokens one group holds; overlapping tokens past this are dropped.
pub const MAX_TOKENS_PER_GROUP: usize = 50;

/// Default number of leading characters analyzed per document.
pub const DEFAULT_MAX_DOC_CHARS: usize = 50 * 1024;

/// Scores tokens by the weight of the query term they match.
#[derive(Debug, Clone, Default)]
pub struct QueryScorer {
    weights: HashMap<String, f32>,
}

impl QueryScorer {
    /// Creates a scorer with no terms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a weighted term. A term seen twice keeps its highest weight.
    pub fn add_term(&mut self, term: impl Into<String>, weight: f32) {
        let entry = self.weights.entry(term.into()).or_insert(weight);
        if weight > *entry {
            *entry = weight;
        }
    }

    /// Builds a scorer from a phrase query.
    ///
    /// The sentence is analyzed with each field's analyzer; every resulting
    /// term is weighted by that field's boost.
    pub fn from_phrase<I: TextIndex + ?Sized>(index: &I, phrase: &PhraseQuery) -> IndexResult<Self> {
        let mut scorer = Self::new();
        for field in &phrase.fields {
            for token in index.analyze(&field.field, &phrase.sentence)? {
                scorer.add_term(token.term, field.boost);
            }
        }
        Ok(scorer)
    }

    /// Returns the weight of a term, or 0 if it is not a query term.
    pub fn term_weight(&self, term: &str) -> f32 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// Returns the number of distinct query terms.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns true if the scorer has no terms.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// A scored span of the original text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightSpan<'a> {
    /// The spanned text.
    pub text: &'a str,
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Sum of the scores of the group's tokens.
    pub score: f32,
}

#[derive(Debug, Default)]
struct TokenGroup {
    num_tokens: usize,
    end: usize,
    match_start: usize,
    match_end: usize,
    total_score: f32,
}

impl TokenGroup {
    fn is_distinct(&self, token: &Token) -> bool {
        token.start >= self.end
    }

    /// Adds a token; a full group ignores tokens until the next distinct one.
    fn add(&mut self, token: &Token, score: f32) {
        if self.num_tokens >= MAX_TOKENS_PER_GROUP {
            return;
        }
        if self.num_tokens == 0 {
            self.end = token.end;
            self.match_start = token.start;
            self.match_end = token.end;
            self.total_score += score;
        } else {
            self.end = self.end.max(token.end);
            if score > 0.0 {
                if self.total_score == 0.0 {
                    self.match_start = token.start;
                    self.match_end = token.end;
                } else {
                    self.match_start = self.match_start.min(token.start);
                    self.match_end = self.match_end.max(token.end);
                }
                self.total_score += score;
            }
        }
        self.num_tokens += 1;
    }
}

/// Groups and scores analyzed tokens over their source text.
#[derive(Debug, Clone)]
pub struct Highlighter {
    scorer: QueryScorer,
    max_doc_chars: usize,
}

impl Highlighter {
    /// Creates a highlighter.
    pub fn new(scorer: QueryScorer) -> Self {
        Self {
            scorer,
            max_doc_chars: DEFAULT_MAX_DOC_CHARS,
        }
    }

    /// Limits how much of each document is analyzed.
    pub fn with_max_doc_chars(mut self, max_doc_chars: usize) -> Self {
        self.max_doc_chars = max_doc_chars;
        self
    }

    /// Reports every token group of `tokens` to `on_span`, in text order.
    ///
    /// Tokens starting at or past the doc char limit are not read.
    ///
    /// # Errors
    ///
    /// Returns an internal error if a token's offsets do not fall on character
    /// boundaries inside `text`.
    pub fn highlight<F>(&self, text: &str, tokens: &[Token], mut on_span: F) -> FulltextResult<()>
    where
        F: FnMut(HighlightSpan<'_>),
    {
        let mut group = TokenGroup::default();

        for token in tokens {
            if token.start > token.end || token.end > text.len() {
                return Err(FulltextError::internal(format!(
                    "token '{}' has offsets {}..{} outside text of length {}",
                    token.term,
                    token.start,
                    token.end,
                    text.len()
                )));
            }
            if token.start >= self.max_doc_chars {
                break;
            }

            if group.num_tokens > 0 && group.is_distinct(token) {
                emit(text, &group, &mut on_span)?;
                group = TokenGroup::default();
            }

            group.add(token, self.scorer.term_weight(&token.term));
        }

        if group.num_tokens > 0 {
            emit(text, &group, &mut on_span)?;
        }

        Ok(())
    }
}

fn emit<F>(text: &str, group: &TokenGroup, on_span: &mut F) -> FulltextResult<()>
where
    F: FnMut(HighlightSpan<'_>),
{
    let span = text.get(group.match_start..group.match_end).ok_or_else(|| {
        FulltextError::internal(format!(
            "token offsets {}..{} are not on character boundaries",
            group.match_start, group.match_end
        ))
    })?;

    on_span(HighlightSpan {
        text: span,
        start: group.match_start,
        end: group.match_end,
        score: group.total_score,
    });
    Ok(())
}
