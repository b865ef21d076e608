//! Text index trait.

use crate::analysis::Token;
use crate::error::IndexResult;
use crate::query::{TextQuery, fields};

/// The single stored field returned for each hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// The internal numeric identity.
    Id,
    /// The stored (unanalyzed) content text.
    ContentText,
}

impl Projection {
    /// Returns the index field name for this projection.
    pub fn field(&self) -> &'static str {
        match self {
            Projection::Id => fields::ID,
            Projection::ContentText => fields::CONTENT_TEXT,
        }
    }
}

/// A projected stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedValue {
    /// An internal identity.
    Id(i64),
    /// Stored text.
    Text(String),
}

/// One search hit carrying only the requested projection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Relevance score assigned by the index.
    pub score: f32,
    /// The projected value, `None` if the document has no stored value.
    pub value: Option<ProjectedValue>,
}

impl IndexHit {
    /// Returns the projected identity, if any.
    pub fn id(&self) -> Option<i64> {
        match self.value {
            Some(ProjectedValue::Id(id)) => Some(id),
            _ => None,
        }
    }

    /// Returns the projected text, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(ProjectedValue::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// A query submission.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    /// The query to run.
    pub query: TextQuery,
    /// The stored field to project.
    pub projection: Projection,
    /// Maximum number of hits; `None` returns the full result set.
    pub max_results: Option<usize>,
}

impl IndexRequest {
    /// Creates an unbounded request.
    pub fn new(query: TextQuery, projection: Projection) -> Self {
        Self {
            query,
            projection,
            max_results: None,
        }
    }

    /// Caps the number of hits.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// A read-only full-text index over resources.
///
/// Implementations own their own read concurrency; this crate never writes
/// through this trait.
pub trait TextIndex: Send + Sync {
    /// Runs a query and returns hits in ranking order.
    ///
    /// # Errors
    ///
    /// * `IndexError::Unavailable` - If the index cannot be reached
    /// * `IndexError::UnknownField` - If the query names a field the index lacks
    /// * `IndexError::MalformedQuery` - If the query cannot be executed
    fn search(&self, request: &IndexRequest) -> IndexResult<Vec<IndexHit>>;

    /// Runs the analyzer configured for `field` over `text`.
    ///
    /// Tokens carry byte offsets into `text` and positions, so they can be fed
    /// to the [`Highlighter`](crate::highlight::Highlighter).
    fn analyze(&self, field: &str, text: &str) -> IndexResult<Vec<Token>>;
}

impl<T: TextIndex + ?Sized> TextIndex for std::sync::Arc<T> {
    fn search(&self, request: &IndexRequest) -> IndexResult<Vec<IndexHit>> {
        (**self).search(request)
    }

    fn analyze(&self, field: &str, text: &str) -> IndexResult<Vec<Token>> {
        (**self).analyze(field, text)
    }
}
