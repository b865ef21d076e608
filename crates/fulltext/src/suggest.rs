//! Keyword suggestions scoped to a patient's `$everything` closure.
//!
//! A suggestion request runs one boosted phrase query over four projections of
//! the content text (standard, edge n-gram, n-gram, phonetic), restricted to
//! resources that reference the context patient. Each hit's stored text is then
//! re-analyzed and highlighted three times:
//!
//! 1. phonetic - catches sound-alike spellings
//! 2. n-gram - catches infix matches
//! 3. edge n-gram - catches prefixes, and in this pass unscored spans that
//!    contain an earlier candidate (or the typed text) become partial matches
//!
//! Every scored span becomes a candidate. Candidates are then ranked and
//! deduplicated case-insensitively.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::FulltextConfig;
use crate::core::{IdResolver, IndexRequest, Projection, TextIndex};
use crate::error::{FulltextError, FulltextResult};
use crate::highlight::{HighlightSpan, Highlighter, QueryScorer};
use crate::query::{BoolQuery, PhraseQuery, TextQuery, fields};
use crate::types::{Suggestion, SuggestionContext, rank_suggestions};

/// One highlighting pass over a stored text.
#[derive(Debug)]
struct SuggestPass<'a> {
    /// Field whose analyzer tokenizes the stored text.
    field: &'static str,
    /// Seeds for partial matching; `None` disables it.
    partial_seeds: Option<&'a [Suggestion]>,
}

/// Produces ranked completion terms for partially typed text.
#[derive(Debug, Clone)]
pub struct SuggestionEngine<I, R> {
    index: I,
    resolver: R,
    config: FulltextConfig,
}

impl<I: TextIndex, R: IdResolver> SuggestionEngine<I, R> {
    /// Creates an engine with the default configuration.
    pub fn new(index: I, resolver: R) -> Self {
        Self {
            index,
            resolver,
            config: FulltextConfig::default(),
        }
    }

    /// Creates an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `FulltextError::InvalidConfig` if `config` fails validation.
    pub fn with_config(index: I, resolver: R, config: FulltextConfig) -> FulltextResult<Self> {
        config.validate().map_err(FulltextError::invalid_config)?;
        Ok(Self {
            index,
            resolver,
            config,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FulltextConfig {
        &self.config
    }

    /// Suggests completions for `text` within `context`.
    ///
    /// `context` must be `Patient/<id>/$everything`. `search_param` names the
    /// parameter being typed into; it is validated but does not change which
    /// fields are searched.
    ///
    /// # Errors
    ///
    /// * `FulltextError::InvalidRequest` - If an argument is blank, the context
    ///   is malformed, or the context patient does not exist
    /// * `FulltextError::Index` - If the index query fails
    /// * `FulltextError::Internal` - If re-analysis or highlighting of a hit fails
    pub fn suggest(
        &self,
        context: &str,
        search_param: &str,
        text: &str,
    ) -> FulltextResult<Vec<Suggestion>> {
        require_non_blank("context", context)?;
        require_non_blank("search parameter", search_param)?;
        require_non_blank("text", text)?;

        let start = Instant::now();

        let context = SuggestionContext::parse(context)?;
        let pid = self
            .resolver
            .resolve(&context.resource_type, &context.logical_id)
            .map_err(|e| match e {
                FulltextError::Resource(err) => FulltextError::invalid_request(err.to_string()),
                other => other,
            })?;

        let phrase = PhraseQuery {
            fields: self.config.suggest_fields(),
            sentence: text.to_lowercase(),
            slop: self.config.suggest_slop,
        };

        let mut query = BoolQuery::new();
        query
            .must(TextQuery::term(fields::RESOURCE_LINKS, pid))
            .must(TextQuery::Phrase(phrase.clone()));

        let request = IndexRequest::new(query.into(), Projection::ContentText)
            .with_max_results(self.config.suggest_max_results);
        let hits = self.index.search(&request)?;

        let scorer = QueryScorer::from_phrase(&self.index, &phrase)
            .map_err(|e| FulltextError::internal(e.to_string()))?;
        let highlighter =
            Highlighter::new(scorer).with_max_doc_chars(self.config.highlight_max_doc_chars);

        let mut suggestions = Vec::new();
        for hit in &hits {
            let Some(stored) = hit.text() else {
                warn!(score = hit.score, "Skipping hit without stored content");
                continue;
            };

            for field in [fields::CONTENT_TEXT_PHONETIC, fields::CONTENT_TEXT_NGRAM] {
                let pass = SuggestPass {
                    field,
                    partial_seeds: None,
                };
                let found = self.run_pass(&highlighter, &pass, stored, text)?;
                suggestions.extend(found);
            }

            let mut seeds = suggestions.clone();
            seeds.push(Suggestion::new(text, 1.0));
            let pass = SuggestPass {
                field: fields::CONTENT_TEXT_EDGE_NGRAM,
                partial_seeds: Some(&seeds),
            };
            let found = self.run_pass(&highlighter, &pass, stored, text)?;
            suggestions.extend(found);
        }

        let suggestions = rank_suggestions(suggestions);

        info!(
            count = suggestions.len(),
            text,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Provided keyword suggestions"
        );

        Ok(suggestions)
    }

    /// Highlights `stored` with the pass's analyzer and returns the new candidates.
    fn run_pass(
        &self,
        highlighter: &Highlighter,
        pass: &SuggestPass<'_>,
        stored: &str,
        typed: &str,
    ) -> FulltextResult<Vec<Suggestion>> {
        let tokens = self
            .index
            .analyze(pass.field, stored)
            .map_err(|e| FulltextError::internal(e.to_string()))?;

        let mut found = Vec::new();
        highlighter.highlight(stored, &tokens, |span| {
            debug!(
                field = pass.field,
                span = span.text,
                score = span.score,
                "Highlighted span"
            );
            self.collect_span(&span, pass, typed, &mut found);
        })?;

        Ok(found)
    }

    fn collect_span(
        &self,
        span: &HighlightSpan<'_>,
        pass: &SuggestPass<'_>,
        typed: &str,
        found: &mut Vec<Suggestion>,
    ) {
        if span.score > 0.0 {
            let mut score = span.score;
            if span.text.to_lowercase() == typed.to_lowercase() {
                score += self.config.exact_match_bonus;
            }
            found.push(Suggestion::new(span.text, score));
            return;
        }

        let Some(seeds) = pass.partial_seeds else {
            return;
        };
        if span.text.chars().count() >= self.config.partial_match_max_len {
            return;
        }

        // the last seed is the typed text itself and is matched without a leading space
        let last = seeds.len().saturating_sub(1);
        for (i, seed) in seeds.iter().enumerate() {
            let matched = if i == last {
                span.text.contains(seed.term.as_str())
            } else {
                span.text.contains(&format!(" {}", seed.term))
            };
            if matched {
                found.push(Suggestion::new(
                    span.text,
                    seed.score - self.config.partial_match_penalty,
                ));
            }
        }
    }
}

fn require_non_blank(name: &str, value: &str) -> FulltextResult<()> {
    if value.trim().is_empty() {
        return Err(FulltextError::invalid_request(format!(
            "{} must be provided",
            name
        )));
    }
    Ok(())
}
