//! Suggestion context parsing.
//!
//! Keyword suggestions are scoped to the `$everything` closure of a patient.
//! The context arrives as the request path of that operation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FulltextError, FulltextResult};

/// The only resource type that may anchor a suggestion context.
pub const CONTEXT_RESOURCE_TYPE: &str = "Patient";

/// The operation segment that closes a suggestion context.
pub const EVERYTHING_OPERATION: &str = "$everything";

/// The resource whose reference closure scopes a suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionContext {
    /// The resource type, always [`CONTEXT_RESOURCE_TYPE`].
    pub resource_type: String,
    /// The logical id of the resource.
    pub logical_id: String,
}

impl SuggestionContext {
    /// Parses a context path of the form `Patient/<id>/$everything`.
    ///
    /// Empty path segments are ignored, so leading, trailing, and doubled
    /// slashes are tolerated.
    ///
    /// # Examples
    ///
    /// ```
    /// use helios_fulltext::types::SuggestionContext;
    ///
    /// let ctx = SuggestionContext::parse("Patient/42/$everything").unwrap();
    /// assert_eq!(ctx.logical_id, "42");
    ///
    /// assert!(SuggestionContext::parse("Patient/42").is_err());
    /// assert!(SuggestionContext::parse("Encounter/5/$everything").is_err());
    /// ```
    pub fn parse(context: &str) -> FulltextResult<Self> {
        let parts: Vec<&str> = context.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            [resource_type, logical_id, operation]
                if *resource_type == CONTEXT_RESOURCE_TYPE
                    && *operation == EVERYTHING_OPERATION =>
            {
                Ok(Self {
                    resource_type: resource_type.to_string(),
                    logical_id: logical_id.to_string(),
                })
            }
            _ => Err(FulltextError::invalid_request(format!(
                "Invalid context: {}",
                context
            ))),
        }
    }
}

impl fmt::Display for SuggestionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.resource_type, self.logical_id, EVERYTHING_OPERATION
        )
    }
}
