//! Decides when a route change requires a new search.

use std::sync::Arc;

use tracing::debug;

use crate::{routes::RouteParams, stores::SearchLoader};

/// True when moving from `prev` to `next` must issue a load: the query text or
/// the source changed. A view-only change never does.
pub fn requires_search(prev: &RouteParams, next: &RouteParams) -> bool {
    prev.query != next.query || prev.source != next.source
}

/// Issues loads on the search-result store. It neither awaits, retries nor
/// caches; identical consecutive pairs are filtered by [`requires_search`] only.
pub struct SearchOrchestrator {
    loader: Arc<dyn SearchLoader>,
    loads_issued: u64,
}

impl SearchOrchestrator {
    pub fn new(loader: Arc<dyn SearchLoader>) -> Self {
        Self {
            loader,
            loads_issued: 0,
        }
    }

    pub fn on_mount(&mut self, params: &RouteParams) {
        self.run_search(params);
    }

    /// Returns whether a load was issued.
    pub fn on_params_changed(&mut self, prev: &RouteParams, next: &RouteParams) -> bool {
        if !requires_search(prev, next) {
            debug!(view = %next.view, "route change without search input change");
            return false;
        }
        self.run_search(next);
        true
    }

    pub fn loads_issued(&self) -> u64 {
        self.loads_issued
    }

    fn run_search(&mut self, params: &RouteParams) {
        self.loads_issued += 1;
        self.loader.load(&params.source, &params.query);
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
