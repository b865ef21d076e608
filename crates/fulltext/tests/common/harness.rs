//! Seeded index harness.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use helios_fulltext::analysis::Token;
use helios_fulltext::backends::{IndexedResource, MemoryIdResolver, MemoryTextIndex};
use helios_fulltext::core::{IndexHit, IndexRequest, TextIndex};
use helios_fulltext::{FulltextConfig, FulltextSearchDao, IndexError, IndexResult};

use super::fixtures::*;

/// A [`TextIndex`] wrapper that counts index calls and records request limits.
#[derive(Debug, Default)]
pub struct CountingIndex {
    inner: MemoryTextIndex,
    searches: AtomicUsize,
    analyses: AtomicUsize,
    limits: Mutex<Vec<Option<usize>>>,
    /// `analyze` fails once this many calls have succeeded.
    fail_analyze_after: Option<usize>,
}

impl CountingIndex {
    /// Wraps an index.
    pub fn new(inner: MemoryTextIndex) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Wraps an index whose `analyze` fails after `calls` successful calls.
    pub fn failing_analyze_after(inner: MemoryTextIndex, calls: usize) -> Self {
        Self {
            fail_analyze_after: Some(calls),
            ..Self::new(inner)
        }
    }

    /// Number of `search` calls so far.
    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    /// Number of `analyze` calls so far, including failed ones.
    pub fn analyses(&self) -> usize {
        self.analyses.load(Ordering::SeqCst)
    }

    /// `max_results` of every search request, in call order.
    pub fn limits(&self) -> Vec<Option<usize>> {
        self.limits.lock().clone()
    }
}

impl TextIndex for CountingIndex {
    fn search(&self, request: &IndexRequest) -> IndexResult<Vec<IndexHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.limits.lock().push(request.max_results);
        self.inner.search(request)
    }

    fn analyze(&self, field: &str, text: &str) -> IndexResult<Vec<Token>> {
        let previous = self.analyses.fetch_add(1, Ordering::SeqCst);
        if self.fail_analyze_after.is_some_and(|limit| previous >= limit) {
            return Err(IndexError::Unavailable {
                message: format!("analysis of {} refused", field),
            });
        }
        self.inner.analyze(field, text)
    }
}

/// Creates an index holding `fixtures`.
pub fn seeded_index(fixtures: &[ResourceFixture]) -> MemoryTextIndex {
    let index = MemoryTextIndex::new();
    for fixture in fixtures {
        index.index(IndexedResource::from_json(
            fixture.pid,
            &fixture.resource,
            fixture.links.iter().copied(),
        ));
    }
    index
}

/// Creates a resolver that knows both fixture patients.
pub fn patient_resolver() -> MemoryIdResolver {
    let resolver = MemoryIdResolver::new();
    resolver.register("Patient", PATIENT_ID, PATIENT_PID);
    resolver.register("Patient", OTHER_PATIENT_ID, OTHER_PATIENT_PID);
    resolver
}

/// Creates a DAO over every fixture.
pub fn create_dao() -> FulltextSearchDao<CountingIndex, MemoryIdResolver> {
    create_dao_with(&all_fixtures())
}

/// Creates a DAO over the given fixtures.
pub fn create_dao_with(
    fixtures: &[ResourceFixture],
) -> FulltextSearchDao<CountingIndex, MemoryIdResolver> {
    create_dao_over(CountingIndex::new(seeded_index(fixtures)))
}

/// Creates a DAO over a prepared index with the test configuration.
pub fn create_dao_over(
    index: CountingIndex,
) -> FulltextSearchDao<CountingIndex, MemoryIdResolver> {
    let config = FulltextConfig::for_testing();
    helios_fulltext::init_logging(&config.log_level);
    FulltextSearchDao::with_config(index, patient_resolver(), config).unwrap()
}
