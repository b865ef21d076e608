//! Text index query model.
//!
//! [`TextQuery`] is a small boolean query tree over named index fields. It is
//! backend-neutral: the in-memory index evaluates it directly and
//! [`elasticsearch`] renders it as Query DSL.

mod builder;
pub mod elasticsearch;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::{ReferenceConstraint, TextQueryBuilder};

/// Index field names.
pub mod fields {
    /// Internal numeric identity of the resource.
    pub const ID: &str = "id";
    /// Resource type name.
    pub const RESOURCE_TYPE: &str = "resource_type";
    /// All string content of the resource, standard analysis.
    pub const CONTENT_TEXT: &str = "content_text";
    /// Content text, phrase-level edge n-grams.
    pub const CONTENT_TEXT_EDGE_NGRAM: &str = "content_text_edge_ngram";
    /// Content text, word-level n-grams.
    pub const CONTENT_TEXT_NGRAM: &str = "content_text_ngram";
    /// Content text, phonetic codes.
    pub const CONTENT_TEXT_PHONETIC: &str = "content_text_phonetic";
    /// Narrative text, standard analysis.
    pub const NARRATIVE_TEXT: &str = "narrative_text";
    /// Internal identities of the resources this resource references.
    pub const RESOURCE_LINKS: &str = "resource_links.target_resource_pid";
}

/// A value matched exactly against a keyword or identity field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermValue {
    /// A numeric identity.
    Long(i64),
    /// A keyword.
    Str(String),
}

impl fmt::Display for TermValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermValue::Long(v) => write!(f, "{}", v),
            TermValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for TermValue {
    fn from(value: i64) -> Self {
        TermValue::Long(value)
    }
}

impl From<&str> for TermValue {
    fn from(value: &str) -> Self {
        TermValue::Str(value.to_string())
    }
}

impl From<String> for TermValue {
    fn from(value: String) -> Self {
        TermValue::Str(value)
    }
}

/// A field with a relative scoring weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedField {
    /// The index field.
    pub field: String,
    /// Relative weight of matches in this field.
    pub boost: f32,
}

impl BoostedField {
    /// Creates a boosted field.
    pub fn new(field: impl Into<String>, boost: f32) -> Self {
        Self {
            field: field.into(),
            boost,
        }
    }
}

/// A sloppy phrase match across several analyzed projections of the same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseQuery {
    /// Fields searched, each with its boost.
    pub fields: Vec<BoostedField>,
    /// The phrase; each field analyzes it with its own analyzer.
    pub sentence: String,
    /// Maximum positional distance still counted as a phrase match.
    pub slop: u32,
}

/// Boolean combination of clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    /// Clauses that must all match.
    pub must: Vec<TextQuery>,
    /// Clauses of which at least one must match when `must` is empty.
    pub should: Vec<TextQuery>,
}

impl BoolQuery {
    /// Creates an empty boolean query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required clause.
    pub fn must(&mut self, clause: TextQuery) -> &mut Self {
        self.must.push(clause);
        self
    }

    /// Adds an optional clause.
    pub fn should(&mut self, clause: TextQuery) -> &mut Self {
        self.should.push(clause);
        self
    }

    /// Returns true if no clause was added.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty()
    }

    /// Returns the number of clauses.
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len()
    }
}

/// A query against the text index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextQuery {
    /// Boolean combination.
    Bool(BoolQuery),
    /// The value is analyzed with the field's analyzer; any resulting term matches.
    Keyword {
        /// The analyzed field.
        field: String,
        /// Free text to analyze.
        value: String,
    },
    /// Exact match of any of the values.
    Terms {
        /// The keyword or identity field.
        field: String,
        /// Accepted values.
        values: Vec<TermValue>,
    },
    /// Sloppy multi-field phrase.
    Phrase(PhraseQuery),
}

impl TextQuery {
    /// Creates a keyword clause.
    pub fn keyword(field: impl Into<String>, value: impl Into<String>) -> Self {
        TextQuery::Keyword {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a single-value exact clause.
    pub fn term(field: impl Into<String>, value: impl Into<TermValue>) -> Self {
        TextQuery::Terms {
            field: field.into(),
            values: vec![value.into()],
        }
    }

    /// Creates a multi-value exact clause.
    pub fn terms<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<TermValue>,
    {
        TextQuery::Terms {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<BoolQuery> for TextQuery {
    fn from(value: BoolQuery) -> Self {
        TextQuery::Bool(value)
    }
}

impl From<PhraseQuery> for TextQuery {
    fn from(value: PhraseQuery) -> Self {
        TextQuery::Phrase(value)
    }
}
