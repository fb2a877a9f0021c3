use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClusterId, DocumentId, SourceId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub source: SourceId,
    pub query: String,
    pub results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub label: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub documents: Vec<DocumentId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subclusters: Vec<Cluster>,
}

impl Cluster {
    /// Documents of this cluster and every nested subcluster, in visit order.
    pub fn all_documents(&self) -> Vec<DocumentId> {
        let mut out = self.documents.clone();
        for sub in &self.subclusters {
            out.extend(sub.all_documents());
        }
        out
    }

    /// Depth-first search for a cluster id within this subtree.
    pub fn find(&self, id: ClusterId) -> Option<&Cluster> {
        if self.id == id {
            return Some(self);
        }
        self.subclusters.iter().find_map(|sub| sub.find(id))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_at: Option<DateTime<Utc>>,
}

impl SearchResponse {
    pub fn find_cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.iter().find_map(|cluster| cluster.find(id))
    }
}
