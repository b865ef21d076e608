//! Caller-facing full-text search operations.
//!
//! [`FulltextSearchDao`] ties the query builder, the search executor, and the
//! suggestion engine to one text index and one identity resolver.
//!
//! # Example
//!
//! ```rust
//! use helios_fulltext::backends::{IndexedResource, MemoryIdResolver, MemoryTextIndex};
//! use helios_fulltext::types::{PARAM_CONTENT, SearchParameterMap};
//! use helios_fulltext::FulltextSearchDao;
//!
//! let index = MemoryTextIndex::new();
//! index.index(IndexedResource::new(1, "Condition").with_content("chronic cough"));
//!
//! let dao = FulltextSearchDao::new(index, MemoryIdResolver::new());
//! let params = SearchParameterMap::new().with_and(PARAM_CONTENT, ["cough"]);
//!
//! assert_eq!(dao.search(Some("Condition"), &params).unwrap(), Some(vec![1]));
//! assert_eq!(dao.search(None, &SearchParameterMap::new()).unwrap(), None);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::config::FulltextConfig;
use crate::core::{IdResolver, TextIndex};
use crate::error::{FulltextError, FulltextResult};
use crate::query::{ReferenceConstraint, TextQueryBuilder};
use crate::search::SearchExecutor;
use crate::suggest::SuggestionEngine;
use crate::types::{PARAM_ID, SearchParameterMap, Suggestion};

/// Full-text search, `$everything` and keyword suggestion over a text index.
#[derive(Debug, Clone)]
pub struct FulltextSearchDao<I, R> {
    builder: TextQueryBuilder,
    executor: SearchExecutor<Arc<I>>,
    suggestions: SuggestionEngine<Arc<I>, Arc<R>>,
    resolver: Arc<R>,
}

impl<I: TextIndex, R: IdResolver> FulltextSearchDao<I, R> {
    /// Creates a DAO with the default configuration.
    pub fn new(index: I, resolver: R) -> Self {
        let index = Arc::new(index);
        let resolver = Arc::new(resolver);

        Self {
            builder: TextQueryBuilder::new(),
            executor: SearchExecutor::new(Arc::clone(&index)),
            suggestions: SuggestionEngine::new(index, Arc::clone(&resolver)),
            resolver,
        }
    }

    /// Creates a DAO with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `FulltextError::InvalidConfig` if `config` fails validation.
    pub fn with_config(index: I, resolver: R, config: FulltextConfig) -> FulltextResult<Self> {
        let index = Arc::new(index);
        let resolver = Arc::new(resolver);
        let suggestions =
            SuggestionEngine::with_config(Arc::clone(&index), Arc::clone(&resolver), config)?;

        Ok(Self {
            builder: TextQueryBuilder::new(),
            executor: SearchExecutor::new(index),
            suggestions,
            resolver,
        })
    }

    /// Returns the text index.
    pub fn index(&self) -> &I {
        self.executor.index()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FulltextConfig {
        self.suggestions.config()
    }

    /// Finds resources matching the `_content` and `_text` parameters.
    ///
    /// Returns `Ok(None)` when the parameters carry no search criteria; the
    /// index is not queried in that case.
    ///
    /// # Errors
    ///
    /// Returns `FulltextError::Index` if the index query fails.
    pub fn search(
        &self,
        resource_type: Option<&str>,
        params: &SearchParameterMap,
    ) -> FulltextResult<Option<Vec<i64>>> {
        self.do_search(resource_type, params, None)
    }

    /// Finds resources for the `$everything` operation.
    ///
    /// When `_id` is present, its first value (`Type/id`, or a bare id of
    /// `resource_type`) is resolved to an internal identity; results are then
    /// restricted to resources referencing it, regardless of their type, and the
    /// identity itself is appended. Without `_id` this is an untyped search.
    ///
    /// # Errors
    ///
    /// * `FulltextError::InvalidRequest` - If `_id` cannot be resolved
    /// * `FulltextError::Index` - If the index query fails
    pub fn everything(
        &self,
        resource_type: Option<&str>,
        params: &SearchParameterMap,
    ) -> FulltextResult<Option<Vec<i64>>> {
        let pid = match params.first_value(PARAM_ID) {
            Some(id) => Some(self.resolve_id(resource_type, id.trimmed())?),
            None => None,
        };

        let reference = pid.map(ReferenceConstraint::referencing);
        let mut result = self.do_search(None, params, reference.as_ref())?;

        if let Some(pid) = pid {
            result.get_or_insert_with(Vec::new).push(pid);
        }
        Ok(result)
    }

    /// Suggests completions for `text` typed into `search_param` within `context`.
    ///
    /// See [`SuggestionEngine::suggest`].
    pub fn suggest_keywords(
        &self,
        context: &str,
        search_param: &str,
        text: &str,
    ) -> FulltextResult<Vec<Suggestion>> {
        self.suggestions.suggest(context, search_param, text)
    }

    fn do_search(
        &self,
        resource_type: Option<&str>,
        params: &SearchParameterMap,
        reference: Option<&ReferenceConstraint>,
    ) -> FulltextResult<Option<Vec<i64>>> {
        let Some(query) = self.builder.build(resource_type, params, reference) else {
            return Ok(None);
        };
        self.executor.execute(&query).map(Some)
    }

    fn resolve_id(&self, resource_type: Option<&str>, id: &str) -> FulltextResult<i64> {
        let parts: Vec<&str> = id.split('/').filter(|p| !p.is_empty()).collect();
        let (type_name, logical_id) = match parts.as_slice() {
            [logical_id] => match resource_type.filter(|t| !t.trim().is_empty()) {
                Some(type_name) => (type_name, *logical_id),
                None => {
                    return Err(FulltextError::invalid_request(format!(
                        "Resource type required to resolve _id: {}",
                        id
                    )));
                }
            },
            [type_name, logical_id] | [type_name, logical_id, "_history", _] => {
                (*type_name, *logical_id)
            }
            _ => {
                return Err(FulltextError::invalid_request(format!(
                    "Invalid _id: {}",
                    id
                )));
            }
        };

        debug!(type_name, logical_id, "Resolving $everything target");

        self.resolver
            .resolve(type_name, logical_id)
            .map_err(|e| match e {
                FulltextError::Resource(err) => FulltextError::invalid_request(err.to_string()),
                other => other,
            })
    }
}
