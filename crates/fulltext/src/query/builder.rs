//! Boolean query assembly for `_content` and `_text` searches.

use tracing::debug;

use crate::types::{AndOrList, PARAM_CONTENT, PARAM_TEXT, SearchParameterMap};

use super::{BoolQuery, TextQuery, fields};

/// Restricts results to resources linking to one of the target identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceConstraint {
    /// The reference-link field.
    pub field: String,
    /// Accepted target identities.
    pub targets: Vec<i64>,
}

impl ReferenceConstraint {
    /// Constrains to resources that reference `pid`.
    pub fn referencing(pid: i64) -> Self {
        Self {
            field: fields::RESOURCE_LINKS.to_string(),
            targets: vec![pid],
        }
    }
}

/// Text search parameters and the index field each one searches.
const TEXT_PARAMS: [(&str, &str); 2] = [
    (PARAM_CONTENT, fields::CONTENT_TEXT),
    (PARAM_TEXT, fields::NARRATIVE_TEXT),
];

/// Builds boolean text queries from search parameter groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextQueryBuilder;

impl TextQueryBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Assembles the query for a search request.
    ///
    /// Returns `None` when no clause could be built. Callers must treat that as
    /// "no search criteria" and skip the index rather than scanning everything.
    /// The resource type restriction is only added on top of another clause.
    pub fn build(
        &self,
        resource_type: Option<&str>,
        params: &SearchParameterMap,
        reference: Option<&ReferenceConstraint>,
    ) -> Option<TextQuery> {
        let mut bool_query = BoolQuery::new();

        for (param, field) in TEXT_PARAMS {
            if let Some(groups) = params.get(param) {
                add_text_search(&mut bool_query, groups, field);
            }
        }

        if let Some(reference) = reference {
            bool_query.must(TextQuery::terms(
                reference.field.clone(),
                reference.targets.iter().copied(),
            ));
        }

        if bool_query.is_empty() {
            debug!("No full-text criteria in request");
            return None;
        }

        if let Some(resource_type) = resource_type.map(str::trim).filter(|t| !t.is_empty()) {
            bool_query.must(TextQuery::term(fields::RESOURCE_TYPE, resource_type));
        }

        debug!(clauses = bool_query.clause_count(), "Assembled full-text query");
        Some(bool_query.into())
    }
}

/// Adds one `must` keyword clause per AND-group with at least one non-blank value.
fn add_text_search(bool_query: &mut BoolQuery, groups: &AndOrList, field: &str) {
    for or_list in groups {
        let mut terms: Vec<&str> = Vec::new();
        for value in or_list {
            let trimmed = value.trimmed();
            if !trimmed.is_empty() && !terms.contains(&trimmed) {
                terms.push(trimmed);
            }
        }

        if !terms.is_empty() {
            bool_query.must(TextQuery::keyword(field, terms.join(" ")));
        }
    }
}
