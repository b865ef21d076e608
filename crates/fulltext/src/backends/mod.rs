//! Text index backends.
//!
//! - [`memory`] - An embedded index with built-in analysis chains
//!
//! Remote indexes are driven through the query renderer in
//! [`query::elasticsearch`](crate::query::elasticsearch).

pub mod memory;

pub use memory::{IndexedResource, MemoryIdResolver, MemoryTextIndex};
