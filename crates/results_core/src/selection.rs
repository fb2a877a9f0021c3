//! Cluster selection, document selection and document visibility.
//!
//! Visibility is derived, never set: it is recomputed from the cluster
//! selection and the current result set whenever either changes.

use std::{collections::BTreeSet, sync::Arc};

use shared::{
    domain::{ClusterId, DocumentId},
    protocol::SearchResponse,
};
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentVisibility {
    #[default]
    All,
    Only(BTreeSet<DocumentId>),
}

impl DocumentVisibility {
    pub fn is_visible(&self, id: DocumentId) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&id),
        }
    }
}

pub struct SelectionCoordinator {
    results: watch::Sender<Arc<SearchResponse>>,
    clusters: watch::Sender<BTreeSet<ClusterId>>,
    documents: watch::Sender<BTreeSet<DocumentId>>,
    visibility: watch::Sender<DocumentVisibility>,
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self {
            results: watch::channel(Arc::new(SearchResponse::default())).0,
            clusters: watch::channel(BTreeSet::new()).0,
            documents: watch::channel(BTreeSet::new()).0,
            visibility: watch::channel(DocumentVisibility::All).0,
        }
    }

    pub fn cluster_selection(&self) -> BTreeSet<ClusterId> {
        self.clusters.borrow().clone()
    }

    pub fn document_selection(&self) -> BTreeSet<DocumentId> {
        self.documents.borrow().clone()
    }

    pub fn visibility(&self) -> DocumentVisibility {
        self.visibility.borrow().clone()
    }

    pub fn is_cluster_selected(&self, id: ClusterId) -> bool {
        self.clusters.borrow().contains(&id)
    }

    pub fn is_document_selected(&self, id: DocumentId) -> bool {
        self.documents.borrow().contains(&id)
    }

    pub fn is_document_visible(&self, id: DocumentId) -> bool {
        self.visibility.borrow().is_visible(id)
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.borrow().is_empty()
            && self.documents.borrow().is_empty()
            && *self.visibility.borrow() == DocumentVisibility::All
    }

    pub fn subscribe_clusters(&self) -> watch::Receiver<BTreeSet<ClusterId>> {
        self.clusters.subscribe()
    }

    pub fn subscribe_documents(&self) -> watch::Receiver<BTreeSet<DocumentId>> {
        self.documents.subscribe()
    }

    pub fn subscribe_visibility(&self) -> watch::Receiver<DocumentVisibility> {
        self.visibility.subscribe()
    }

    pub fn select_clusters(&self, ids: impl IntoIterator<Item = ClusterId>) {
        self.clusters.send_replace(ids.into_iter().collect());
        self.recompute_visibility();
    }

    pub fn toggle_cluster(&self, id: ClusterId) {
        self.clusters.send_modify(|selected| {
            if !selected.remove(&id) {
                selected.insert(id);
            }
        });
        self.recompute_visibility();
    }

    pub fn clear_clusters(&self) {
        self.select_clusters([]);
    }

    pub fn select_documents(&self, ids: impl IntoIterator<Item = DocumentId>) {
        self.documents.send_replace(ids.into_iter().collect());
    }

    pub fn toggle_document(&self, id: DocumentId) {
        self.documents.send_modify(|selected| {
            if !selected.remove(&id) {
                selected.insert(id);
            }
        });
    }

    pub fn clear_documents(&self) {
        self.select_documents([]);
    }

    /// Swaps in a new result set. Selections refer to the previous set's
    /// identities, so all three containers go back to their defaults.
    pub fn replace_results(&self, results: Arc<SearchResponse>) {
        debug!(
            documents = results.documents.len(),
            clusters = results.clusters.len(),
            "selection reset for new results"
        );
        self.results.send_replace(results);
        self.reset();
    }

    pub fn reset(&self) {
        self.clusters.send_replace(BTreeSet::new());
        self.documents.send_replace(BTreeSet::new());
        self.recompute_visibility();
    }

    fn recompute_visibility(&self) {
        let next = {
            let selected = self.clusters.borrow();
            if selected.is_empty() {
                DocumentVisibility::All
            } else {
                let results = self.results.borrow();
                let ids = selected
                    .iter()
                    .filter_map(|id| results.find_cluster(*id))
                    .flat_map(|cluster| cluster.all_documents())
                    .collect();
                DocumentVisibility::Only(ids)
            }
        };
        self.visibility.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
