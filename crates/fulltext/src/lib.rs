//! Helios FHIR Server Full-Text Search
//!
//! This crate answers two questions over a full-text index of FHIR resources:
//!
//! - which resources match the `_content` and `_text` search parameters,
//!   optionally restricted to the resources that reference a patient
//!   (`$everything`), and
//! - which terms best complete a partially typed phrase within a patient's
//!   `$everything` closure.
//!
//! # Architecture
//!
//! - [`types`] - Search parameters, suggestion contexts and ranked suggestions
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`TextIndex`] and [`IdResolver`] collaborator traits
//! - [`analysis`] - Standard, edge n-gram, n-gram and phonetic analysis chains
//! - [`query`] - The backend-neutral query tree, its builder, and its
//!   Elasticsearch rendering
//! - [`highlight`] - Token grouping and weighted-term scoring
//! - [`search`] - Identity-only query execution
//! - [`suggest`] - Keyword suggestion
//! - [`dao`] - The caller-facing operations
//! - [`backends`] - The in-memory index and resolver
//! - [`extract`] - Searchable text extraction from FHIR JSON
//!
//! # Quick Start
//!
//! ```
//! use helios_fulltext::backends::{IndexedResource, MemoryIdResolver, MemoryTextIndex};
//! use helios_fulltext::types::{PARAM_CONTENT, PARAM_ID, SearchParameterMap};
//! use helios_fulltext::FulltextSearchDao;
//!
//! let index = MemoryTextIndex::new();
//! index.index(
//!     IndexedResource::new(100, "MedicationStatement")
//!         .with_content("Aspirin 81 MG oral tablet")
//!         .with_links([7]),
//! );
//!
//! let resolver = MemoryIdResolver::new();
//! resolver.register("Patient", "42", 7);
//!
//! let dao = FulltextSearchDao::new(index, resolver);
//!
//! // $everything for Patient/42 filtered by content
//! let params = SearchParameterMap::new()
//!     .with_and(PARAM_ID, ["Patient/42"])
//!     .with_and(PARAM_CONTENT, ["aspirin"]);
//! assert_eq!(dao.everything(None, &params).unwrap(), Some(vec![100, 7]));
//!
//! // Completions for "aspi"
//! let suggestions = dao
//!     .suggest_keywords("Patient/42/$everything", "_content", "aspi")
//!     .unwrap();
//! assert_eq!(suggestions[0].term, "Aspirin");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod backends;
pub mod config;
pub mod core;
pub mod dao;
pub mod error;
pub mod extract;
pub mod highlight;
pub mod logging;
pub mod query;
pub mod search;
pub mod suggest;
pub mod types;

// Re-export commonly used types at crate root
pub use config::FulltextConfig;
pub use dao::FulltextSearchDao;
pub use error::{FulltextError, FulltextResult, IndexError, IndexResult, ResourceError};
pub use logging::init_logging;
pub use types::{SearchParameterMap, Suggestion, SuggestionContext};

// Re-export core traits
pub use core::{IdResolver, TextIndex};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
