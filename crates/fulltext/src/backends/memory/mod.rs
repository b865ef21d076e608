//! In-memory text index.
//!
//! [`MemoryTextIndex`] keeps analyzed documents behind a read/write lock and
//! evaluates [`TextQuery`] trees directly. It uses the same analysis chains a
//! remote index would be configured with (see
//! [`index_mapping`](crate::query::elasticsearch::index_mapping)), which makes
//! it suitable for embedded deployments and tests.

mod document;
mod resolver;

use std::collections::{BTreeMap, HashSet};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::analysis::Token;
use crate::core::{IndexHit, IndexRequest, ProjectedValue, Projection, TextIndex};
use crate::error::{IndexError, IndexResult};
use crate::query::{BoolQuery, PhraseQuery, TermValue, TextQuery, fields};

use document::{AnalyzedField, StoredDocument};

pub use document::{IndexedResource, analyzer_for};
pub use resolver::MemoryIdResolver;

/// An in-memory [`TextIndex`].
///
/// Documents are kept in insertion order, which breaks score ties.
#[derive(Debug, Default)]
pub struct MemoryTextIndex {
    documents: RwLock<Vec<StoredDocument>>,
}

impl MemoryTextIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, replacing any document with the same id.
    pub fn index(&self, resource: IndexedResource) {
        let id = resource.id;
        let doc = StoredDocument::analyze(resource);
        let mut documents = self.documents.write();

        match documents.iter_mut().find(|d| d.resource.id == id) {
            Some(existing) => *existing = doc,
            None => documents.push(doc),
        }
        debug!(id, "Indexed resource");
    }

    /// Removes a resource. Returns true if it was present.
    pub fn remove(&self, id: i64) -> bool {
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|d| d.resource.id != id);
        before != documents.len()
    }

    /// Returns the number of indexed resources.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl TextIndex for MemoryTextIndex {
    fn search(&self, request: &IndexRequest) -> IndexResult<Vec<IndexHit>> {
        let matcher = Matcher::compile(&request.query)?;
        let documents = self.documents.read();

        let mut scored = Vec::new();
        for doc in documents.iter() {
            if let Some(score) = matcher.score(doc) {
                scored.push((score, doc));
            }
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        if let Some(max) = request.max_results {
            scored.truncate(max);
        }

        trace!(hits = scored.len(), "Evaluated query");

        Ok(scored
            .into_iter()
            .map(|(score, doc)| IndexHit {
                score,
                value: project(doc, request.projection),
            })
            .collect())
    }

    fn analyze(&self, field: &str, text: &str) -> IndexResult<Vec<Token>> {
        analyzer_for(field)
            .map(|analyzer| analyzer.analyze(text))
            .ok_or_else(|| IndexError::UnknownField {
                field: field.to_string(),
            })
    }
}

fn project(doc: &StoredDocument, projection: Projection) -> Option<ProjectedValue> {
    match projection {
        Projection::Id => Some(ProjectedValue::Id(doc.resource.id)),
        Projection::ContentText => doc.resource.content_text.clone().map(ProjectedValue::Text),
    }
}

/// Terms of one analyzed query, grouped by position.
type PositionTerms = Vec<HashSet<String>>;

/// A query with its text clauses analyzed once up front.
#[derive(Debug)]
enum Matcher {
    Bool {
        must: Vec<Matcher>,
        should: Vec<Matcher>,
    },
    Keyword {
        field: String,
        terms: HashSet<String>,
    },
    Id(Vec<i64>),
    ResourceType(Vec<String>),
    Links(Vec<i64>),
    Phrase(Vec<(String, f32, PositionTerms)>, usize),
}

impl Matcher {
    fn compile(query: &TextQuery) -> IndexResult<Self> {
        match query {
            TextQuery::Bool(bool_query) => Self::compile_bool(bool_query),
            TextQuery::Keyword { field, value } => {
                let analyzer = analyzer_for(field).ok_or_else(|| IndexError::UnknownField {
                    field: field.clone(),
                })?;
                Ok(Matcher::Keyword {
                    field: field.clone(),
                    terms: analyzer.analyze(value).into_iter().map(|t| t.term).collect(),
                })
            }
            TextQuery::Terms { field, values } => Self::compile_terms(field, values),
            TextQuery::Phrase(phrase) => Self::compile_phrase(phrase),
        }
    }

    fn compile_bool(query: &BoolQuery) -> IndexResult<Self> {
        if query.is_empty() {
            return Err(IndexError::MalformedQuery {
                message: "boolean query has no clauses".to_string(),
            });
        }
        Ok(Matcher::Bool {
            must: query.must.iter().map(Self::compile).collect::<IndexResult<_>>()?,
            should: query.should.iter().map(Self::compile).collect::<IndexResult<_>>()?,
        })
    }

    fn compile_terms(field: &str, values: &[TermValue]) -> IndexResult<Self> {
        let longs = || {
            values
                .iter()
                .filter_map(|v| match v {
                    TermValue::Long(n) => Some(*n),
                    TermValue::Str(s) => s.parse().ok(),
                })
                .collect()
        };

        match field {
            fields::ID => Ok(Matcher::Id(longs())),
            fields::RESOURCE_LINKS => Ok(Matcher::Links(longs())),
            fields::RESOURCE_TYPE => Ok(Matcher::ResourceType(
                values.iter().map(ToString::to_string).collect(),
            )),
            _ => Err(IndexError::UnknownField {
                field: field.to_string(),
            }),
        }
    }

    fn compile_phrase(phrase: &PhraseQuery) -> IndexResult<Self> {
        let mut compiled = Vec::with_capacity(phrase.fields.len());

        for boosted in &phrase.fields {
            let analyzer =
                analyzer_for(&boosted.field).ok_or_else(|| IndexError::UnknownField {
                    field: boosted.field.clone(),
                })?;

            let mut by_position: BTreeMap<usize, HashSet<String>> = BTreeMap::new();
            for token in analyzer.analyze(&phrase.sentence) {
                by_position.entry(token.position).or_default().insert(token.term);
            }
            compiled.push((
                boosted.field.clone(),
                boosted.boost,
                by_position.into_values().collect(),
            ));
        }

        Ok(Matcher::Phrase(compiled, phrase.slop as usize))
    }

    /// Returns the document's score, or `None` if it does not match.
    fn score(&self, doc: &StoredDocument) -> Option<f32> {
        match self {
            Matcher::Bool { must, should } => {
                let mut total = 0.0;
                for clause in must {
                    total += clause.score(doc)?;
                }
                let mut any_should = false;
                for clause in should {
                    if let Some(score) = clause.score(doc) {
                        total += score;
                        any_should = true;
                    }
                }
                (!must.is_empty() || any_should).then_some(total)
            }
            Matcher::Keyword { field, terms } => {
                let analyzed = doc.field(field)?;
                let matched = terms.iter().filter(|t| analyzed.terms.contains(*t)).count();
                (matched > 0).then_some(matched as f32)
            }
            Matcher::Id(ids) => ids.contains(&doc.resource.id).then_some(1.0),
            Matcher::ResourceType(types) => types
                .iter()
                .any(|t| *t == doc.resource.resource_type)
                .then_some(1.0),
            Matcher::Links(targets) => targets
                .iter()
                .any(|t| doc.resource.links.contains(t))
                .then_some(1.0),
            Matcher::Phrase(by_field, slop) => by_field
                .iter()
                .filter(|(field, _, positions)| {
                    doc.field(field)
                        .is_some_and(|analyzed| phrase_matches(analyzed, positions, *slop))
                })
                .map(|(_, boost, _)| *boost)
                .reduce(f32::max),
        }
    }
}

/// Ordered sloppy phrase match.
///
/// Each query position must be matched by a later document position than the
/// previous one; the total number of skipped document positions may not exceed
/// `slop`. Any term stacked at a position satisfies it.
fn phrase_matches(field: &AnalyzedField, query: &[HashSet<String>], slop: usize) -> bool {
    let Some((first, rest)) = query.split_first() else {
        return false;
    };
    let hits = |terms: &HashSet<String>, at: &HashSet<String>| terms.iter().any(|t| at.contains(t));

    'start: for (&start, at) in &field.positions {
        if !hits(first, at) {
            continue;
        }

        let mut previous = start;
        let mut skipped = 0;
        for terms in rest {
            let budget = slop - skipped;
            let next = field
                .positions
                .range(previous + 1..=previous + 1 + budget)
                .find(|(_, at)| hits(terms, at));

            match next {
                Some((&position, _)) => {
                    skipped += position - previous - 1;
                    previous = position;
                }
                None => continue 'start,
            }
        }
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::BoostedField;

    fn index_with(resources: Vec<IndexedResource>) -> MemoryTextIndex {
        let index = MemoryTextIndex::new();
        for resource in resources {
            index.index(resource);
        }
        index
    }

    fn ids(index: &MemoryTextIndex, query: TextQuery) -> Vec<i64> {
        index
            .search(&IndexRequest::new(query, Projection::Id))
            .unwrap()
            .iter()
            .filter_map(IndexHit::id)
            .collect()
    }

    fn phrase(sentence: &str, fields: &[(&str, f32)], slop: u32) -> TextQuery {
        TextQuery::Phrase(PhraseQuery {
            fields: fields.iter().map(|(f, b)| BoostedField::new(*f, *b)).collect(),
            sentence: sentence.to_string(),
            slop,
        })
    }

    #[test]
    fn test_index_replaces_same_id() {
        let index = index_with(vec![
            IndexedResource::new(1, "Observation").with_content("old"),
            IndexedResource::new(1, "Observation").with_content("new"),
        ]);
        assert_eq!(index.len(), 1);
        assert!(ids(&index, TextQuery::keyword(fields::CONTENT_TEXT, "old")).is_empty());
        assert_eq!(ids(&index, TextQuery::keyword(fields::CONTENT_TEXT, "new")), vec![1]);

        assert!(index.remove(1));
        assert!(!index.remove(1));
        assert!(index.is_empty());
    }

    #[test]
    fn test_keyword_matches_any_term_and_ranks_by_count() {
        let index = index_with(vec![
            IndexedResource::new(1, "Condition").with_content("chronic cough"),
            IndexedResource::new(2, "Condition").with_content("chronic migraine with cough"),
            IndexedResource::new(3, "Condition").with_content("fracture"),
        ]);

        let hits = ids(&index, TextQuery::keyword(fields::CONTENT_TEXT, "Migraine cough"));
        assert_eq!(hits, vec![2, 1]);
    }

    #[test]
    fn test_bool_requires_all_musts() {
        let index = index_with(vec![
            IndexedResource::new(1, "Condition").with_content("cough").with_links([9]),
            IndexedResource::new(2, "Observation").with_content("cough").with_links([9]),
            IndexedResource::new(3, "Condition").with_content("cough").with_links([8]),
        ]);

        let mut query = BoolQuery::new();
        query
            .must(TextQuery::keyword(fields::CONTENT_TEXT, "cough"))
            .must(TextQuery::term(fields::RESOURCE_LINKS, 9_i64))
            .must(TextQuery::term(fields::RESOURCE_TYPE, "Condition"));

        assert_eq!(ids(&index, query.into()), vec![1]);
    }

    #[test]
    fn test_should_needs_one_match_without_musts() {
        let index = index_with(vec![
            IndexedResource::new(1, "Condition"),
            IndexedResource::new(2, "Observation"),
        ]);

        let mut query = BoolQuery::new();
        query
            .should(TextQuery::term(fields::ID, 2_i64))
            .should(TextQuery::term(fields::ID, 5_i64));
        assert_eq!(ids(&index, query.into()), vec![2]);
    }

    #[test]
    fn test_empty_bool_is_malformed() {
        let index = MemoryTextIndex::new();
        let result = index.search(&IndexRequest::new(BoolQuery::new().into(), Projection::Id));
        assert!(matches!(result, Err(IndexError::MalformedQuery { .. })));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let index = MemoryTextIndex::new();
        let result = index.search(&IndexRequest::new(
            TextQuery::keyword("no_such_field", "x"),
            Projection::Id,
        ));
        assert!(matches!(result, Err(IndexError::UnknownField { field }) if field == "no_such_field"));
        assert!(index.analyze("no_such_field", "x").is_err());
    }

    #[test]
    fn test_sloppy_phrase() {
        let index = index_with(vec![
            IndexedResource::new(1, "Observation").with_content("blood pressure high"),
            IndexedResource::new(2, "Observation").with_content("blood sugar and pressure"),
            IndexedResource::new(3, "Observation").with_content("pressure of blood"),
        ]);
        let fields = [(fields::CONTENT_TEXT, 1.0)];

        assert_eq!(ids(&index, phrase("blood pressure", &fields, 0)), vec![1]);
        assert_eq!(ids(&index, phrase("blood pressure", &fields, 2)), vec![1, 2]);
    }

    #[test]
    fn test_phrase_scores_best_field() {
        let index = index_with(vec![
            IndexedResource::new(1, "MedicationStatement").with_content("Take aspirin daily"),
        ]);
        let query = phrase(
            "aspi",
            &[
                (fields::CONTENT_TEXT, 4.0),
                (fields::CONTENT_TEXT_EDGE_NGRAM, 2.0),
                (fields::CONTENT_TEXT_NGRAM, 1.0),
                (fields::CONTENT_TEXT_PHONETIC, 0.5),
            ],
            2,
        );

        let hits = index
            .search(&IndexRequest::new(query, Projection::ContentText))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 1.0);
        assert_eq!(hits[0].text(), Some("Take aspirin daily"));
    }

    #[test]
    fn test_max_results_and_missing_projection() {
        let index = index_with(vec![
            IndexedResource::new(1, "Patient").with_links([7]),
            IndexedResource::new(2, "Patient").with_links([7]),
        ]);
        let request = IndexRequest::new(
            TextQuery::term(fields::RESOURCE_LINKS, 7_i64),
            Projection::ContentText,
        )
        .with_max_results(1);

        let hits = index.search(&request).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, None);
    }
}
