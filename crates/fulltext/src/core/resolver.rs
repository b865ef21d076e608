//! Logical id to internal identity resolution.

use crate::error::FulltextResult;

/// Translates a resource's logical id into its internal numeric identity.
///
/// The persistent store owns this mapping; the search layer only consumes it.
pub trait IdResolver: Send + Sync {
    /// Resolves `resource_type/logical_id`.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` - If no stored resource has this logical id
    fn resolve(&self, resource_type: &str, logical_id: &str) -> FulltextResult<i64>;
}

impl<T: IdResolver + ?Sized> IdResolver for &T {
    fn resolve(&self, resource_type: &str, logical_id: &str) -> FulltextResult<i64> {
        (**self).resolve(resource_type, logical_id)
    }
}

impl<T: IdResolver + ?Sized> IdResolver for std::sync::Arc<T> {
    fn resolve(&self, resource_type: &str, logical_id: &str) -> FulltextResult<i64> {
        (**self).resolve(resource_type, logical_id)
    }
}
