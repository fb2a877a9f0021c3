//! Results screen: the composition root tying routes, search and views together.
//!
//! State machine per mounted screen:
//!
//! - `Init` → first route: issue the initial search, move to `Ready`.
//! - `Ready` → new route: re-search only when query or source changed.
//! - `Ready` → user edit: push one URL carrying the full `(source, query, view)`
//!   triple. The resulting route arrives later through [`ResultsScreen::on_route`].

use std::{collections::BTreeSet, fmt::Write as _, sync::Arc};

use shared::{
    domain::{ClusterId, DocumentId, SourceId, ViewId},
    protocol::{Cluster, SearchResponse},
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    bridge::SearchEvent,
    error::SourceError,
    node::{write_node, Node, PanelAction},
    orchestrator::SearchOrchestrator,
    registry::{PanelContext, Tab, ViewRegistry},
    routes::{search, Navigator, RouteParams},
    selection::{DocumentVisibility, SelectionCoordinator},
    sources::{SourceCatalog, SourceChoice, SourceConfigOptions},
    stores::{LoadStatus, SearchResultState, SearchResultStore},
    switcher::{PanelSwitcher, SwitcherOutput},
    ui_config::{ResultListConfigStore, ThemeStore},
    views::LIST_VIEW,
};

/// Draft query text behind the search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    draft: String,
}

impl SearchForm {
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            draft: initial_query.into(),
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Throws away any unsubmitted edit in favour of `initial_query`.
    pub fn reset(&mut self, initial_query: &str) {
        self.draft.clear();
        self.draft.push_str(initial_query);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScreenState {
    Init,
    Ready(RouteParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    Init,
    Ready,
}

/// Everything one frame of the screen shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenView {
    pub params: Option<RouteParams>,
    pub query_draft: String,
    pub sources: Vec<SourceChoice>,
    pub cluster_tabs: Vec<Tab>,
    pub result_tabs: Vec<Tab>,
    pub clusters: SwitcherOutput,
    pub documents: SwitcherOutput,
    pub status: String,
}

impl ScreenView {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let sources = self
            .sources
            .iter()
            .map(|s| if s.active { format!("*{}", s.label) } else { s.label.clone() })
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(out, "[form] query: \"{}\"  sources: {sources}", self.query_draft);
        let _ = writeln!(out, "[clusters-tabs] {}", tabs_text(&self.cluster_tabs));
        let _ = writeln!(out, "[docs-tabs] {}", tabs_text(&self.result_tabs));
        let _ = writeln!(out, "[clusters]");
        for panel in &self.clusters.visible {
            write_node(&mut out, &panel.content, 1);
        }
        let _ = writeln!(out, "[docs]");
        for panel in &self.documents.visible {
            write_node(&mut out, &panel.content, 1);
        }
        let _ = writeln!(out, "[status] {}", self.status);
        out
    }
}

fn tabs_text(tabs: &[Tab]) -> String {
    tabs.iter()
        .map(|t| if t.active { format!("*{}", t.label) } else { t.label.clone() })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn status_line(state: &SearchResultState) -> String {
    match &state.status {
        LoadStatus::Idle => "Ready".to_string(),
        LoadStatus::Loading => match &state.source {
            Some(source) => format!("Searching {source} for \"{}\"...", state.query),
            None => "Searching...".to_string(),
        },
        LoadStatus::Loaded => format!(
            "{} results for \"{}\"",
            state.documents.len(),
            state.query
        ),
        LoadStatus::Failed(message) => format!("Search failed: {message}"),
    }
}

pub struct ScreenDependencies {
    pub cluster_views: Arc<ViewRegistry>,
    pub results_views: Arc<ViewRegistry>,
    pub sources: Arc<SourceCatalog>,
    pub search_results: Arc<SearchResultStore>,
    pub selection: Arc<SelectionCoordinator>,
    pub theme: Arc<ThemeStore>,
    pub list_config: Arc<ResultListConfigStore>,
    pub navigator: Arc<dyn Navigator>,
}

struct Subscriptions {
    results: watch::Receiver<SearchResultState>,
    clusters: watch::Receiver<Vec<Cluster>>,
    visibility: watch::Receiver<DocumentVisibility>,
    documents: watch::Receiver<BTreeSet<DocumentId>>,
    cluster_selection: watch::Receiver<BTreeSet<ClusterId>>,
}

impl Subscriptions {
    fn new(ctx: &PanelContext) -> Self {
        Self {
            results: ctx.search_results.subscribe(),
            clusters: ctx.clusters.subscribe(),
            visibility: ctx.selection.subscribe_visibility(),
            documents: ctx.selection.subscribe_documents(),
            cluster_selection: ctx.selection.subscribe_clusters(),
        }
    }

    fn take_changes(&mut self) -> bool {
        // Every receiver must be drained, so no short-circuiting here.
        let changes = [
            drain(&mut self.results),
            drain(&mut self.clusters),
            drain(&mut self.visibility),
            drain(&mut self.documents),
            drain(&mut self.cluster_selection),
        ];
        changes.contains(&true)
    }
}

fn drain<T>(rx: &mut watch::Receiver<T>) -> bool {
    let changed = rx.has_changed().unwrap_or(false);
    if changed {
        let _ = rx.borrow_and_update();
    }
    changed
}

pub struct ResultsScreen {
    state: ScreenState,
    orchestrator: SearchOrchestrator,
    form: SearchForm,
    cluster_panels: PanelSwitcher,
    result_panels: PanelSwitcher,
    sources: Arc<SourceCatalog>,
    navigator: Arc<dyn Navigator>,
    ctx: PanelContext,
    subscriptions: Option<Subscriptions>,
}

impl ResultsScreen {
    pub fn new(deps: ScreenDependencies) -> Self {
        let ctx = PanelContext {
            clusters: deps.search_results.cluster_store(),
            selection: deps.selection,
            search_results: Arc::clone(&deps.search_results),
            theme: deps.theme,
            list_config: deps.list_config,
        };
        let subscriptions = Subscriptions::new(&ctx);
        Self {
            state: ScreenState::Init,
            orchestrator: SearchOrchestrator::new(deps.search_results),
            form: SearchForm::default(),
            cluster_panels: PanelSwitcher::new(deps.cluster_views),
            result_panels: PanelSwitcher::new(deps.results_views),
            sources: deps.sources,
            navigator: deps.navigator,
            ctx,
            subscriptions: Some(subscriptions),
        }
    }

    pub fn phase(&self) -> ScreenPhase {
        match self.state {
            ScreenState::Init => ScreenPhase::Init,
            ScreenState::Ready(_) => ScreenPhase::Ready,
        }
    }

    pub fn params(&self) -> Option<&RouteParams> {
        match &self.state {
            ScreenState::Init => None,
            ScreenState::Ready(params) => Some(params),
        }
    }

    pub fn context(&self) -> &PanelContext {
        &self.ctx
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SearchForm {
        &mut self.form
    }

    pub fn cluster_panels(&self) -> &PanelSwitcher {
        &self.cluster_panels
    }

    pub fn loads_issued(&self) -> u64 {
        self.orchestrator.loads_issued()
    }

    /// True while the latest search is still waiting for its completion.
    pub fn is_awaiting_search(&self) -> bool {
        self.ctx.search_results.with_state(SearchResultState::is_loading)
    }

    /// Feeds a route snapshot from the router.
    pub fn on_route(&mut self, params: RouteParams) {
        let loads_before = self.orchestrator.loads_issued();
        match &self.state {
            ScreenState::Init => {
                info!(
                    source = %params.source,
                    query = %params.query,
                    view = %params.view,
                    "results screen mounted"
                );
                self.form.reset(&params.query);
                self.orchestrator.on_mount(&params);
            }
            ScreenState::Ready(prev) => {
                if prev.query != params.query {
                    self.form.reset(&params.query);
                }
                self.orchestrator.on_params_changed(prev, &params);
            }
        }
        self.state = ScreenState::Ready(params);

        // A load rejected by the dispatcher completes without a worker event.
        if self.orchestrator.loads_issued() != loads_before
            && self
                .ctx
                .search_results
                .with_state(|state| matches!(state.status, LoadStatus::Failed(_)))
        {
            self.clear_selection_results();
        }
    }

    pub fn on_search_event(&mut self, event: SearchEvent) -> bool {
        match event {
            SearchEvent::Completed { sequence, outcome } => {
                let results = match &outcome {
                    Ok(response) => response.clone(),
                    Err(_) => SearchResponse::default(),
                };
                if !self.ctx.search_results.complete(sequence, outcome) {
                    return false;
                }
                self.ctx.selection.replace_results(Arc::new(results));
                true
            }
            SearchEvent::WorkerFailed(message) => {
                error!(error = %message, "search worker failed");
                let sequence = self.ctx.search_results.current_sequence();
                let applied = self.ctx.search_results.complete(sequence, Err(message));
                if applied {
                    self.clear_selection_results();
                }
                applied
            }
        }
    }

    pub fn on_query_change(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        self.navigate_with(|params| params.with_query(query))
    }

    pub fn submit_form(&mut self) -> bool {
        let draft = self.form.draft().to_string();
        self.on_query_change(draft)
    }

    pub fn on_source_change(&mut self, source: SourceId) -> bool {
        self.navigate_with(|params| params.with_source(source))
    }

    pub fn on_view_change(&mut self, view: ViewId) -> bool {
        self.navigate_with(|params| params.with_view(view))
    }

    /// The result-view strip is pinned to the list view.
    pub fn on_results_view_change(&mut self, view: ViewId) {
        debug!(view = %view, "result view tabs are fixed; ignoring change");
    }

    pub fn on_panel_action(&mut self, view: &ViewId, action: PanelAction) -> bool {
        if self.cluster_panels.registry().contains(view) {
            return self.cluster_panels.dispatch(view, &action, &self.ctx);
        }
        if self.result_panels.registry().contains(view) {
            return self.result_panels.dispatch(view, &action, &self.ctx);
        }
        warn!(view = %view, ?action, "panel action for unregistered view");
        false
    }

    /// Settings panel of the current source. Fails when the route names a
    /// source that is not configured.
    pub fn source_settings(&self) -> Result<Node, SourceError> {
        match self.params() {
            Some(params) => self
                .sources
                .settings_panel(&params.source, SourceConfigOptions::noop()),
            None => Ok(Node::Empty),
        }
    }

    /// True when any store this screen watches changed since the last call.
    pub fn take_changes(&mut self) -> bool {
        self.subscriptions
            .as_mut()
            .is_some_and(Subscriptions::take_changes)
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Releases store subscriptions. The screen renders nothing new afterwards.
    pub fn unmount(&mut self) {
        if self.subscriptions.take().is_some() {
            info!("results screen unmounted");
        }
    }

    pub fn render(&mut self) -> ScreenView {
        let status = self.ctx.search_results.with_state(status_line);
        let Some(params) = self.params().cloned() else {
            return ScreenView {
                status,
                ..ScreenView::default()
            };
        };

        let list_view = ViewId::from(LIST_VIEW);
        ScreenView {
            query_draft: self.form.draft().to_string(),
            sources: self.sources.choices(&params.source),
            cluster_tabs: self.cluster_panels.registry().tabs(Some(&params.view)),
            result_tabs: self.result_panels.registry().tabs(Some(&list_view)),
            clusters: self.cluster_panels.render(Some(&params.view), &self.ctx),
            documents: self.result_panels.render(Some(&list_view), &self.ctx),
            status,
            params: Some(params),
        }
    }

    fn clear_selection_results(&self) {
        self.ctx
            .selection
            .replace_results(Arc::new(SearchResponse::default()));
    }

    fn navigate_with(&mut self, update: impl FnOnce(&RouteParams) -> RouteParams) -> bool {
        let Some(current) = self.params() else {
            warn!("navigation requested before the first route arrived");
            return false;
        };
        let next = update(current);
        let url = search::build_url(&next);
        info!(url = %url, "navigation requested");
        self.navigator.push(url);
        true
    }
}

#[cfg(test)]
#[path = "tests/screen_tests.rs"]
mod tests;
