//! Test infrastructure for full-text search.
//!
//! Provides FHIR fixtures, a seeded harness around the in-memory index, and
//! ranking assertions.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod harness;

pub use assertions::*;
pub use fixtures::*;
pub use harness::*;
