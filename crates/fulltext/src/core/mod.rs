//! Collaborator traits.
//!
//! - [`TextIndex`] - Executes queries and exposes per-field analyzers
//! - [`IdResolver`] - Maps logical ids to internal identities

mod index;
mod resolver;

pub use index::{IndexHit, IndexRequest, ProjectedValue, Projection, TextIndex};
pub use resolver::IdResolver;
