//! Core request and response types.
//!
//! - [`SearchParameterMap`] - Named AND/OR groups of raw search values
//! - [`SuggestionContext`] - The `Patient/<id>/$everything` scope of a suggestion request
//! - [`Suggestion`] - A ranked completion term, plus the ranking helpers

mod context;
mod search_params;
pub mod suggestion;

pub use context::{CONTEXT_RESOURCE_TYPE, EVERYTHING_OPERATION, SuggestionContext};
pub use search_params::{
    AndOrList, OrList, PARAM_CONTENT, PARAM_ID, PARAM_TEXT, SearchParameterMap, StringParam,
};
pub use suggestion::{Suggestion, rank_suggestions};
