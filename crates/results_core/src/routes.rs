//! Route parameters and the navigation seam between the screen and the router.
//!
//! The router owns the `(source, query, view)` triple. The screen only ever
//! reads a parsed [`RouteParams`] snapshot and answers user edits with a single
//! [`Navigator::push`] carrying a complete URL.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{SourceId, ViewId};
use tracing::{debug, warn};

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteParams {
    pub source: SourceId,
    pub query: String,
    pub view: ViewId,
}

impl RouteParams {
    pub fn new(
        source: impl Into<SourceId>,
        query: impl Into<String>,
        view: impl Into<ViewId>,
    ) -> Self {
        Self {
            source: source.into(),
            query: query.into(),
            view: view.into(),
        }
    }

    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }

    pub fn with_source(&self, source: SourceId) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }

    pub fn with_view(&self, view: ViewId) -> Self {
        Self {
            view,
            ..self.clone()
        }
    }
}

/// The `/search/{source}/{query}/{view}` route.
pub mod search {
    use std::borrow::Cow;

    use shared::domain::is_slug;

    use super::RouteParams;
    use crate::error::RouteError;

    pub const PREFIX: &str = "search";

    pub fn build_url(params: &RouteParams) -> String {
        format!(
            "/{PREFIX}/{}/{}/{}",
            urlencoding::encode(params.source.as_str()),
            urlencoding::encode(&params.query),
            urlencoding::encode(params.view.as_str()),
        )
    }

    /// Parses either a bare path or an absolute URL whose path is a search route.
    pub fn parse_url(raw: &str) -> Result<RouteParams, RouteError> {
        // The path is sliced from the raw text so `.` and `..` queries survive;
        // `Url` would normalise them away.
        let path = match raw.split_once("://") {
            Some((_, rest)) => {
                url::Url::parse(raw)?;
                rest.find('/').map_or("", |start| &rest[start..])
            }
            None => raw,
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let trimmed = path.trim_start_matches('/');
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let mut segments = trimmed.split('/');
        if segments.next() != Some(PREFIX) {
            return Err(RouteError::NotASearchRoute(raw.to_string()));
        }

        let source = decode(segments.next(), "source")?;
        let query = decode(segments.next(), "query")?;
        let view = decode(segments.next(), "view")?;
        if segments.next().is_some() {
            return Err(RouteError::NotASearchRoute(raw.to_string()));
        }
        if source.is_empty() {
            return Err(RouteError::MissingSegment("source"));
        }
        if view.is_empty() {
            return Err(RouteError::MissingSegment("view"));
        }
        for (segment, value) in [("source", &source), ("view", &view)] {
            if !is_slug(value) {
                return Err(RouteError::InvalidSlug {
                    segment,
                    value: value.clone(),
                });
            }
        }

        Ok(RouteParams::new(source, query, view))
    }

    fn decode(segment: Option<&str>, name: &'static str) -> Result<String, RouteError> {
        let segment = segment.ok_or(RouteError::MissingSegment(name))?;
        urlencoding::decode(segment)
            .map(Cow::into_owned)
            .map_err(|source| RouteError::Encoding {
                segment: name,
                source,
            })
    }
}

/// Outbound navigation capability. Pushing is fire-and-forget: the resulting
/// route change arrives later through the router, never synchronously.
pub trait Navigator {
    fn push(&self, url: String);
}

/// In-memory router history. Pushed and revisited URLs are queued until the
/// host drains them with [`MemoryHistory::poll`] and feeds them back as routes.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    inner: Mutex<HistoryState>,
}

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<String>,
    index: usize,
    pending: VecDeque<String>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            inner: Mutex::new(HistoryState {
                entries: vec![initial.clone()],
                index: 0,
                pending: VecDeque::from([initial]),
            }),
        }
    }

    pub fn current(&self) -> Option<String> {
        let guard = self.lock();
        guard.entries.get(guard.index).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.lock().index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let guard = self.lock();
        guard.index + 1 < guard.entries.len()
    }

    pub fn back(&self) -> bool {
        let mut guard = self.lock();
        if guard.index == 0 {
            return false;
        }
        guard.index -= 1;
        let url = guard.entries[guard.index].clone();
        guard.pending.push_back(url);
        true
    }

    pub fn forward(&self) -> bool {
        let mut guard = self.lock();
        if guard.index + 1 >= guard.entries.len() {
            return false;
        }
        guard.index += 1;
        let url = guard.entries[guard.index].clone();
        guard.pending.push_back(url);
        true
    }

    /// Next URL the router has moved to and the host has not delivered yet.
    pub fn poll(&self) -> Option<String> {
        self.lock().pending.pop_front()
    }

    /// Next pending URL, parsed as a search route.
    pub fn poll_route(&self) -> Option<Result<RouteParams, RouteError>> {
        self.poll().map(|url| search::parse_url(&url))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for MemoryHistory {
    fn push(&self, url: String) {
        let mut guard = self.lock();
        let keep = if guard.entries.is_empty() {
            0
        } else {
            guard.index + 1
        };
        guard.entries.truncate(keep);
        guard.entries.push(url.clone());
        guard.index = guard.entries.len() - 1;
        debug!(url = %url, depth = guard.entries.len(), "history push");
        guard.pending.push_back(url);
    }
}

/// Forwards pushed URLs to whoever drains the receiver, typically a host event
/// loop that owns the real router.
impl Navigator for Sender<String> {
    fn push(&self, url: String) {
        match self.try_send(url) {
            Ok(()) => {}
            Err(TrySendError::Full(url)) => {
                warn!(url = %url, "navigation queue is full; dropping push");
            }
            Err(TrySendError::Disconnected(url)) => {
                warn!(url = %url, "navigation receiver disconnected; dropping push");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;
