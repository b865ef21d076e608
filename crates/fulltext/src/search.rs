//! Identity-only query execution.

use tracing::{debug, warn};

use crate::core::{IndexRequest, Projection, TextIndex};
use crate::error::FulltextResult;
use crate::query::TextQuery;

/// Runs text queries and returns matching internal identities.
#[derive(Debug, Clone)]
pub struct SearchExecutor<I> {
    index: I,
}

impl<I: TextIndex> SearchExecutor<I> {
    /// Creates an executor over `index`.
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Returns the underlying index.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Executes `query`, returning every matching identity in ranking order.
    ///
    /// Only the identity field is projected and the result set is not capped.
    /// Hits without a stored identity are skipped.
    ///
    /// # Errors
    ///
    /// Returns `FulltextError::Index` if the index rejects or fails the query.
    pub fn execute(&self, query: &TextQuery) -> FulltextResult<Vec<i64>> {
        let request = IndexRequest::new(query.clone(), Projection::Id);
        let hits = self.index.search(&request)?;

        let mut ids = Vec::with_capacity(hits.len());
        for hit in &hits {
            match hit.id() {
                Some(id) => ids.push(id),
                None => warn!(score = hit.score, "Skipping hit without a stored id"),
            }
        }

        debug!(hits = hits.len(), ids = ids.len(), "Executed text query");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Token;
    use crate::core::{IndexHit, ProjectedValue};
    use crate::error::{FulltextError, IndexError, IndexResult};
    use crate::query::fields;

    struct FixedIndex(Vec<IndexHit>);

    impl TextIndex for FixedIndex {
        fn search(&self, request: &IndexRequest) -> IndexResult<Vec<IndexHit>> {
            assert_eq!(request.projection, Projection::Id);
            assert_eq!(request.max_results, None);
            Ok(self.0.clone())
        }

        fn analyze(&self, _field: &str, _text: &str) -> IndexResult<Vec<Token>> {
            Ok(Vec::new())
        }
    }

    struct DownIndex;

    impl TextIndex for DownIndex {
        fn search(&self, _request: &IndexRequest) -> IndexResult<Vec<IndexHit>> {
            Err(IndexError::Unavailable {
                message: "connection refused".to_string(),
            })
        }

        fn analyze(&self, _field: &str, _text: &str) -> IndexResult<Vec<Token>> {
            Ok(Vec::new())
        }
    }

    fn hit(value: Option<ProjectedValue>) -> IndexHit {
        IndexHit { score: 1.0, value }
    }

    #[test]
    fn test_execute_keeps_order_and_skips_missing_ids() {
        let executor = SearchExecutor::new(FixedIndex(vec![
            hit(Some(ProjectedValue::Id(3))),
            hit(None),
            hit(Some(ProjectedValue::Id(1))),
        ]));

        let ids = executor
            .execute(&TextQuery::keyword(fields::CONTENT_TEXT, "cough"))
            .unwrap();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_execute_surfaces_index_errors() {
        let executor = SearchExecutor::new(DownIndex);
        let err = executor
            .execute(&TextQuery::keyword(fields::CONTENT_TEXT, "cough"))
            .unwrap_err();
        assert!(matches!(err, FulltextError::Index(IndexError::Unavailable { .. })));
    }
}
