//! Full-text search parameter types.
//!
//! Search parameters arrive as named groups of AND-ed OR-lists, the same shape
//! FHIR uses for repeated query parameters: `_content=a,b&_content=c` means
//! `(a OR b) AND c`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Searches the full string content of a resource.
pub const PARAM_CONTENT: &str = "_content";

/// Searches the narrative (`text.div`) of a resource.
pub const PARAM_TEXT: &str = "_text";

/// The logical id of a resource.
pub const PARAM_ID: &str = "_id";

/// A single raw string value of a search parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringParam {
    /// The raw value, possibly blank.
    pub value: String,
}

impl StringParam {
    /// Creates a new string parameter.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the value with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Returns true if the value is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

impl From<&str> for StringParam {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StringParam {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Values OR-ed together.
pub type OrList = Vec<StringParam>;

/// OR-lists AND-ed together.
pub type AndOrList = Vec<OrList>;

/// Named search parameter groups for a single request.
///
/// # Examples
///
/// ```
/// use helios_fulltext::types::{SearchParameterMap, PARAM_CONTENT};
///
/// let params = SearchParameterMap::new()
///     .with_and(PARAM_CONTENT, ["aspirin", "ibuprofen"])
///     .with_and(PARAM_CONTENT, ["daily"]);
///
/// assert_eq!(params.get(PARAM_CONTENT).map(|g| g.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParameterMap {
    params: HashMap<String, AndOrList>,
}

impl SearchParameterMap {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an OR-list to the named parameter, AND-ing it with any existing lists.
    pub fn add(&mut self, name: impl Into<String>, or_list: OrList) {
        self.params.entry(name.into()).or_default().push(or_list);
    }

    /// Builder variant of [`add`](Self::add).
    pub fn with_and<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<StringParam>,
    {
        self.add(name, values.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the AND-groups for a parameter.
    pub fn get(&self, name: &str) -> Option<&AndOrList> {
        self.params.get(name)
    }

    /// Returns the first value of the first group for a parameter.
    pub fn first_value(&self, name: &str) -> Option<&StringParam> {
        self.params
            .get(name)
            .and_then(|groups| groups.first())
            .and_then(|group| group.first())
    }

    /// Returns true if the parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Returns true if no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
