//! Search backends executed by the worker thread.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    str::FromStr,
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{DocumentId, SourceId},
    error::ApiError,
    protocol::{Cluster, SearchRequest, SearchResponse},
};
use tracing::debug;

use crate::{config::Settings, error::BackendError};

const SAMPLE_CORPUS: &str = include_str!("../data/sample_corpus.json");

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// Backend selectable from the command line of either app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Built-in sample corpus.
    #[default]
    Static,
    /// POST to the endpoints configured per source.
    Http,
}

impl BackendKind {
    pub fn build(self, settings: &Settings) -> Result<Arc<dyn SearchBackend>> {
        Ok(match self {
            Self::Static => Arc::new(StaticSearchBackend::sample()?),
            Self::Http => Arc::new(HttpSearchBackend::new(settings.endpoints())),
        })
    }
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "http" => Ok(Self::Http),
            other => Err(BackendError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Static => "static",
            Self::Http => "http",
        })
    }
}

pub struct MissingSearchBackend;

#[async_trait]
impl SearchBackend for MissingSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        Err(anyhow!(
            "search backend unavailable for source {}",
            request.source
        ))
    }
}

/// Posts the request as JSON to the endpoint configured for its source.
pub struct HttpSearchBackend {
    http: Client,
    endpoints: HashMap<SourceId, String>,
}

impl HttpSearchBackend {
    pub fn new(endpoints: HashMap<SourceId, String>) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let endpoint = self
            .endpoints
            .get(&request.source)
            .ok_or_else(|| BackendError::NoEndpoint(request.source.clone()))?;

        let res = self
            .http
            .post(endpoint)
            .json(request)
            .send()
            .await
            .with_context(|| format!("failed to reach search endpoint {endpoint}"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api) => format!("{:?}: {}", api.code, api.message),
                Err(_) if body.is_empty() => status.to_string(),
                Err(_) => body,
            };
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let response: SearchResponse = res
            .json()
            .await
            .context("malformed search response body")?;
        debug!(
            source = %request.source,
            documents = response.documents.len(),
            "http search completed"
        );
        Ok(response)
    }
}

/// Serves every source from a fixed corpus. A document matches when its title
/// or snippet contains any query term; an empty query matches everything.
pub struct StaticSearchBackend {
    corpus: SearchResponse,
}

impl StaticSearchBackend {
    pub fn new(corpus: SearchResponse) -> Self {
        Self { corpus }
    }

    /// Small built-in corpus used by the apps when no backend is configured.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_CORPUS)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let corpus = serde_json::from_str(raw).context("invalid static search corpus")?;
        Ok(Self::new(corpus))
    }

    pub fn run(&self, request: &SearchRequest) -> SearchResponse {
        let terms: Vec<String> = request
            .query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let documents: Vec<_> = self
            .corpus
            .documents
            .iter()
            .filter(|doc| {
                if terms.is_empty() {
                    return true;
                }
                let haystack = format!("{} {}", doc.title, doc.snippet).to_lowercase();
                terms.iter().any(|term| haystack.contains(term.as_str()))
            })
            .take(request.results as usize)
            .cloned()
            .collect();

        let matched: BTreeSet<DocumentId> = documents.iter().map(|doc| doc.id).collect();
        let clusters = self
            .corpus
            .clusters
            .iter()
            .filter_map(|cluster| restrict_cluster(cluster, &matched))
            .collect();

        SearchResponse {
            documents,
            clusters,
            served_at: Some(chrono::Utc::now()),
        }
    }
}

fn restrict_cluster(cluster: &Cluster, matched: &BTreeSet<DocumentId>) -> Option<Cluster> {
    let documents: Vec<_> = cluster
        .documents
        .iter()
        .copied()
        .filter(|id| matched.contains(id))
        .collect();
    let subclusters: Vec<_> = cluster
        .subclusters
        .iter()
        .filter_map(|sub| restrict_cluster(sub, matched))
        .collect();
    if documents.is_empty() && subclusters.is_empty() {
        return None;
    }
    Some(Cluster {
        id: cluster.id,
        label: cluster.label.clone(),
        score: cluster.score,
        documents,
        subclusters,
    })
}

#[async_trait]
impl SearchBackend for StaticSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        Ok(self.run(request))
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
