//! Documents held by the in-memory index.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use crate::analysis::{Analyzer, Token};
use crate::extract::SearchableText;
use crate::query::fields;

/// Which stored text an analyzed field is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source {
    Content,
    Narrative,
}

/// Analyzed fields, their analyzers, and their source text.
pub(crate) const TEXT_FIELDS: [(&str, Analyzer, Source); 5] = [
    (fields::CONTENT_TEXT, Analyzer::Standard, Source::Content),
    (
        fields::CONTENT_TEXT_EDGE_NGRAM,
        Analyzer::AUTOCOMPLETE_EDGE,
        Source::Content,
    ),
    (
        fields::CONTENT_TEXT_NGRAM,
        Analyzer::AUTOCOMPLETE_NGRAM,
        Source::Content,
    ),
    (fields::CONTENT_TEXT_PHONETIC, Analyzer::Phonetic, Source::Content),
    (fields::NARRATIVE_TEXT, Analyzer::Standard, Source::Narrative),
];

/// Returns the analyzer of a text field.
pub fn analyzer_for(field: &str) -> Option<Analyzer> {
    TEXT_FIELDS
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|(_, analyzer, _)| *analyzer)
}

/// A resource as submitted to the in-memory index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedResource {
    /// Internal numeric identity.
    pub id: i64,
    /// Resource type name.
    pub resource_type: String,
    /// Stored content text.
    pub content_text: Option<String>,
    /// Stored narrative text.
    pub narrative_text: Option<String>,
    /// Internal identities this resource references.
    pub links: Vec<i64>,
}

impl IndexedResource {
    /// Creates a resource with no text and no links.
    pub fn new(id: i64, resource_type: impl Into<String>) -> Self {
        Self {
            id,
            resource_type: resource_type.into(),
            content_text: None,
            narrative_text: None,
            links: Vec::new(),
        }
    }

    /// Builds a resource from FHIR JSON, extracting its searchable text.
    ///
    /// The type is taken from `resourceType`; references are passed in because
    /// resolving them to internal identities is the store's job.
    pub fn from_json(id: i64, resource: &Value, links: impl IntoIterator<Item = i64>) -> Self {
        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let text = SearchableText::from_resource(resource);

        let mut indexed = Self::new(id, resource_type).with_links(links);
        if !text.content.is_empty() {
            indexed.content_text = Some(text.content);
        }
        if !text.narrative.is_empty() {
            indexed.narrative_text = Some(text.narrative);
        }
        indexed
    }

    /// Sets the content text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content_text = Some(content.into());
        self
    }

    /// Sets the narrative text.
    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative_text = Some(narrative.into());
        self
    }

    /// Adds reference targets.
    pub fn with_links(mut self, links: impl IntoIterator<Item = i64>) -> Self {
        self.links.extend(links);
        self
    }

    fn source(&self, source: Source) -> Option<&str> {
        match source {
            Source::Content => self.content_text.as_deref(),
            Source::Narrative => self.narrative_text.as_deref(),
        }
    }
}

/// One analyzed field of a stored document.
#[derive(Debug, Default)]
pub(crate) struct AnalyzedField {
    pub terms: HashSet<String>,
    pub positions: BTreeMap<usize, HashSet<String>>,
}

impl AnalyzedField {
    fn new(tokens: Vec<Token>) -> Self {
        let mut field = Self::default();
        for token in tokens {
            field
                .positions
                .entry(token.position)
                .or_default()
                .insert(token.term.clone());
            field.terms.insert(token.term);
        }
        field
    }
}

/// A resource with its analyzed fields.
#[derive(Debug)]
pub(crate) struct StoredDocument {
    pub resource: IndexedResource,
    pub fields: HashMap<&'static str, AnalyzedField>,
}

impl StoredDocument {
    pub fn analyze(resource: IndexedResource) -> Self {
        let fields = TEXT_FIELDS
            .iter()
            .filter_map(|(name, analyzer, source)| {
                resource
                    .source(*source)
                    .map(|text| (*name, AnalyzedField::new(analyzer.analyze(text))))
            })
            .collect();

        Self { resource, fields }
    }

    pub fn field(&self, name: &str) -> Option<&AnalyzedField> {
        self.fields.get(name)
    }
}
