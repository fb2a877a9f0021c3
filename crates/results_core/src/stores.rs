//! Observable stores shared by the screen and its panels.
//!
//! Each store wraps a `tokio::sync::watch` sender. The store owns the sender and
//! is the only mutator of its field; everyone else reads a snapshot or holds a
//! receiver from `subscribe`.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use shared::{
    domain::SourceId,
    protocol::{Cluster, Document, SearchRequest, SearchResponse},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::DispatchError;

pub const DEFAULT_RESULT_COUNT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct SearchResultState {
    /// Sequence number of the most recently issued load; 0 before the first.
    pub sequence: u64,
    pub source: Option<SourceId>,
    pub query: String,
    pub status: LoadStatus,
    pub documents: Vec<Document>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl SearchResultState {
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A load request stamped with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub sequence: u64,
    pub request: SearchRequest,
}

/// Trigger capability used by the orchestrator. Fire-and-forget.
pub trait SearchLoader {
    fn load(&self, source: &SourceId, query: &str);
}

/// Hands a ticket to whatever executes searches (usually the backend worker).
pub trait SearchDispatch {
    fn dispatch(&self, ticket: LoadTicket) -> Result<(), DispatchError>;
}

#[derive(Debug)]
pub struct ClusterStore {
    clusters: watch::Sender<Vec<Cluster>>,
}

impl Default for ClusterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterStore {
    pub fn new() -> Self {
        let (clusters, _) = watch::channel(Vec::new());
        Self { clusters }
    }

    pub fn clusters(&self) -> Vec<Cluster> {
        self.clusters.borrow().clone()
    }

    pub fn with_clusters<R>(&self, f: impl FnOnce(&[Cluster]) -> R) -> R {
        f(&self.clusters.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Cluster>> {
        self.clusters.subscribe()
    }

    pub(crate) fn replace(&self, clusters: Vec<Cluster>) {
        self.clusters.send_replace(clusters);
    }
}

/// Holds the outcome of the most recently issued search.
///
/// Loads are tagged with a monotonically increasing sequence number and only
/// the completion carrying the latest number is applied. A failed latest load
/// clears the previous results instead of leaving them on screen.
pub struct SearchResultStore {
    state: watch::Sender<SearchResultState>,
    clusters: Arc<ClusterStore>,
    dispatcher: Arc<dyn SearchDispatch>,
    result_counts: HashMap<SourceId, u32>,
    default_results: u32,
}

impl SearchResultStore {
    pub fn new(dispatcher: Arc<dyn SearchDispatch>) -> Self {
        let (state, _) = watch::channel(SearchResultState::default());
        Self {
            state,
            clusters: Arc::new(ClusterStore::new()),
            dispatcher,
            result_counts: HashMap::new(),
            default_results: DEFAULT_RESULT_COUNT,
        }
    }

    pub fn with_result_counts(
        mut self,
        result_counts: HashMap<SourceId, u32>,
        default_results: u32,
    ) -> Self {
        self.result_counts = result_counts;
        self.default_results = default_results;
        self
    }

    pub fn cluster_store(&self) -> Arc<ClusterStore> {
        Arc::clone(&self.clusters)
    }

    pub fn snapshot(&self) -> SearchResultState {
        self.state.borrow().clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&SearchResultState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn current_sequence(&self) -> u64 {
        self.state.borrow().sequence
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchResultState> {
        self.state.subscribe()
    }

    pub fn result_count_for(&self, source: &SourceId) -> u32 {
        self.result_counts
            .get(source)
            .copied()
            .unwrap_or(self.default_results)
    }

    /// Applies a finished load. Returns `true` when the completion belonged to
    /// the latest issued load and was stored, `false` when it was stale.
    pub fn complete(&self, sequence: u64, outcome: Result<SearchResponse, String>) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if state.sequence != sequence || state.status != LoadStatus::Loading {
                return false;
            }
            match &outcome {
                Ok(response) => {
                    state.status = LoadStatus::Loaded;
                    state.documents = response.documents.clone();
                }
                Err(message) => {
                    state.status = LoadStatus::Failed(message.clone());
                    state.documents.clear();
                }
            }
            true
        });

        if !applied {
            debug!(
                sequence,
                latest = self.current_sequence(),
                "discarding stale search completion"
            );
            return false;
        }

        match outcome {
            Ok(response) => {
                info!(
                    sequence,
                    documents = response.documents.len(),
                    clusters = response.clusters.len(),
                    "search results applied"
                );
                self.clusters.replace(response.clusters);
            }
            Err(message) => {
                warn!(sequence, error = %message, "search load failed");
                self.clusters.replace(Vec::new());
            }
        }
        true
    }
}

impl SearchLoader for SearchResultStore {
    fn load(&self, source: &SourceId, query: &str) {
        let sequence = self.current_sequence() + 1;
        let request = SearchRequest {
            source: source.clone(),
            query: query.to_string(),
            results: self.result_count_for(source),
        };
        self.state.send_modify(|state| {
            state.sequence = sequence;
            state.source = Some(source.clone());
            state.query = query.to_string();
            state.status = LoadStatus::Loading;
            state.issued_at = Some(Utc::now());
        });
        debug!(sequence, source = %source, query, "search load issued");

        if let Err(err) = self.dispatcher.dispatch(LoadTicket { sequence, request }) {
            self.complete(sequence, Err(err.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "tests/stores_tests.rs"]
mod tests;
