use super::*;

use std::sync::Mutex;

use shared::protocol::Document;

use crate::{
    bootstrap::build_screen,
    config::Settings,
    error::DispatchError,
    stores::{LoadTicket, SearchDispatch},
    views::{CLOUD_VIEW, FOLDERS_VIEW},
};

#[derive(Default)]
struct RecordingDispatcher {
    tickets: Mutex<Vec<LoadTicket>>,
    fail_with: Mutex<Option<DispatchError>>,
}

impl RecordingDispatcher {
    fn fail_from_now_on(&self, err: DispatchError) {
        *self.fail_with.lock().expect("lock") = Some(err);
    }

    fn tickets(&self) -> Vec<LoadTicket> {
        self.tickets.lock().expect("lock").clone()
    }
}

impl SearchDispatch for RecordingDispatcher {
    fn dispatch(&self, ticket: LoadTicket) -> Result<(), DispatchError> {
        if let Some(err) = self.fail_with.lock().expect("lock").clone() {
            return Err(err);
        }
        self.tickets.lock().expect("lock").push(ticket);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNavigator {
    pushed: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn pushed(&self) -> Vec<String> {
        self.pushed.lock().expect("lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, url: String) {
        self.pushed.lock().expect("lock").push(url);
    }
}

struct Harness {
    screen: ResultsScreen,
    dispatcher: Arc<RecordingDispatcher>,
    navigator: Arc<RecordingNavigator>,
}

fn harness() -> Harness {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let screen = build_screen(&Settings::default(), dispatcher.clone(), navigator.clone())
        .expect("screen");
    Harness {
        screen,
        dispatcher,
        navigator,
    }
}

fn response() -> SearchResponse {
    SearchResponse {
        documents: (1..=3)
            .map(|id| Document {
                id: DocumentId(id),
                title: format!("Doc {id}"),
                snippet: String::new(),
                url: None,
            })
            .collect(),
        clusters: vec![
            Cluster {
                id: ClusterId(1),
                label: "Alpha".into(),
                score: 0.8,
                documents: vec![DocumentId(1), DocumentId(2)],
                subclusters: Vec::new(),
            },
            Cluster {
                id: ClusterId(2),
                label: "Beta".into(),
                score: 0.4,
                documents: vec![DocumentId(3)],
                subclusters: Vec::new(),
            },
        ],
        served_at: None,
    }
}

fn route(query: &str, view: &str) -> RouteParams {
    RouteParams::new("web", query, view)
}

#[test]
fn first_route_mounts_and_searches_once() {
    let mut h = harness();
    assert_eq!(h.screen.phase(), ScreenPhase::Init);

    h.screen.on_route(route("rust", FOLDERS_VIEW));

    assert_eq!(h.screen.phase(), ScreenPhase::Ready);
    assert_eq!(h.screen.form().draft(), "rust");
    let tickets = h.dispatcher.tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].request.query, "rust");
    assert_eq!(tickets[0].request.source, SourceId::from("web"));
}

#[test]
fn view_change_alone_does_not_search() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    h.screen.on_route(route("rust", CLOUD_VIEW));
    assert_eq!(h.dispatcher.tickets().len(), 1);
    assert_eq!(h.screen.loads_issued(), 1);

    h.screen.on_route(route("tokio", CLOUD_VIEW));
    h.screen.on_route(RouteParams::new("pubmed", "tokio", CLOUD_VIEW));
    assert_eq!(h.dispatcher.tickets().len(), 3);
}

#[test]
fn edits_push_the_full_route_triple() {
    let mut h = harness();
    h.screen.on_route(route("rust lang", FOLDERS_VIEW));

    assert!(h.screen.on_view_change(ViewId::from(CLOUD_VIEW)));
    assert!(h.screen.on_source_change(SourceId::from("pubmed")));
    h.screen.form_mut().set_draft("tokio");
    assert!(h.screen.submit_form());

    assert_eq!(
        h.navigator.pushed(),
        vec![
            "/search/web/rust%20lang/cloud".to_string(),
            "/search/pubmed/rust%20lang/folders".to_string(),
            "/search/web/tokio/folders".to_string(),
        ]
    );
    assert_eq!(h.dispatcher.tickets().len(), 1, "pushing never searches directly");
}

#[test]
fn edits_before_the_first_route_are_ignored() {
    let mut h = harness();
    assert!(!h.screen.on_query_change("rust"));
    assert!(!h.screen.on_view_change(ViewId::from(CLOUD_VIEW)));
    assert!(h.navigator.pushed().is_empty());
}

#[test]
fn query_change_resets_the_form_but_view_change_does_not() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));

    h.screen.form_mut().set_draft("unsubmitted");
    h.screen.on_route(route("rust", CLOUD_VIEW));
    assert_eq!(h.screen.form().draft(), "unsubmitted");

    h.screen.on_route(route("tokio", CLOUD_VIEW));
    assert_eq!(h.screen.form().draft(), "tokio");
}

#[test]
fn completed_search_resets_selection_and_shows_documents() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    let selection = Arc::clone(&h.screen.context().selection);
    selection.select_clusters([ClusterId(7)]);
    selection.select_documents([DocumentId(9)]);

    assert!(h.screen.on_search_event(SearchEvent::Completed {
        sequence: 1,
        outcome: Ok(response()),
    }));

    assert!(selection.is_empty());
    let view = h.screen.render();
    assert_eq!(view.status, "3 results for \"rust\"");
    let docs = &view.documents.visible[0].content;
    assert_eq!(docs.item_labels(), vec!["Doc 1", "Doc 2", "Doc 3"]);
}

#[test]
fn stale_completion_changes_nothing() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    h.screen.on_route(route("tokio", FOLDERS_VIEW));
    let selection = Arc::clone(&h.screen.context().selection);
    selection.select_documents([DocumentId(2)]);

    assert!(!h.screen.on_search_event(SearchEvent::Completed {
        sequence: 1,
        outcome: Ok(response()),
    }));

    assert_eq!(selection.document_selection().len(), 1);
    assert!(h.screen.context().search_results.snapshot().is_loading());
}

#[test]
fn panel_actions_reach_the_mounted_panels() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    h.screen.on_search_event(SearchEvent::Completed {
        sequence: 1,
        outcome: Ok(response()),
    });

    let folders = ViewId::from(FOLDERS_VIEW);
    assert!(h
        .screen
        .on_panel_action(&folders, PanelAction::ToggleCluster(ClusterId(2))));
    let view = h.screen.render();
    assert_eq!(
        view.documents.visible[0].content.item_labels(),
        vec!["Doc 3"]
    );

    assert!(h
        .screen
        .on_panel_action(&ViewId::from(LIST_VIEW), PanelAction::ToggleDocument(DocumentId(3))));
    assert!(h.screen.context().selection.is_document_selected(DocumentId(3)));

    assert!(!h
        .screen
        .on_panel_action(&ViewId::from("grid"), PanelAction::ClearClusterSelection));
}

#[test]
fn unknown_view_renders_tabs_but_no_cluster_panel() {
    let mut h = harness();
    h.screen.on_route(route("rust", "grid"));
    let view = h.screen.render();
    assert!(view.clusters.visible.is_empty());
    assert_eq!(view.cluster_tabs.len(), 2);
    assert!(view.cluster_tabs.iter().all(|tab| !tab.active));
    assert_eq!(view.documents.visible_ids(), vec![ViewId::from(LIST_VIEW)]);
}

#[test]
fn switching_views_keeps_every_cluster_panel_mounted() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    h.screen.render();
    h.screen.on_route(route("rust", CLOUD_VIEW));
    let view = h.screen.render();

    assert_eq!(view.clusters.visible_ids(), vec![ViewId::from(CLOUD_VIEW)]);
    assert_eq!(view.clusters.hidden, vec![ViewId::from(FOLDERS_VIEW)]);
    assert!(h.screen.cluster_panels().is_mounted(&ViewId::from(FOLDERS_VIEW)));
}

#[test]
fn result_view_tabs_stay_on_the_list() {
    let mut h = harness();
    h.screen.on_route(route("rust", CLOUD_VIEW));
    h.screen.on_results_view_change(ViewId::from("table"));
    let view = h.screen.render();
    assert_eq!(view.result_tabs.len(), 1);
    assert!(view.result_tabs[0].active);
    assert!(h.navigator.pushed().is_empty());
}

#[test]
fn unknown_source_settings_is_an_error() {
    let mut h = harness();
    h.screen.on_route(RouteParams::new("arxiv", "rust", FOLDERS_VIEW));
    assert_eq!(
        h.screen.source_settings().err(),
        Some(SourceError::UnknownSource(SourceId::from("arxiv")))
    );

    h.screen.on_route(route("rust", FOLDERS_VIEW));
    let settings = h.screen.source_settings().expect("settings");
    assert!(settings.to_text().contains("Web search options"));
}

#[test]
fn worker_failure_fails_the_pending_search() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    assert!(h
        .screen
        .on_search_event(SearchEvent::WorkerFailed("runtime gone".into())));
    assert_eq!(h.screen.render().status, "Search failed: runtime gone");
}

#[test]
fn rejected_dispatch_clears_the_previous_selection() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    assert!(h.screen.on_search_event(SearchEvent::Completed {
        sequence: 1,
        outcome: Ok(response()),
    }));
    let selection = Arc::clone(&h.screen.context().selection);
    selection.select_clusters([ClusterId(1)]);
    selection.select_documents([DocumentId(2)]);
    assert!(!selection.is_document_visible(DocumentId(3)));

    h.dispatcher.fail_from_now_on(DispatchError::QueueFull);
    h.screen.on_route(route("tokio", FOLDERS_VIEW));

    let state = h.screen.context().search_results.snapshot();
    assert_eq!(
        state.status,
        LoadStatus::Failed(DispatchError::QueueFull.to_string())
    );
    assert!(state.documents.is_empty());
    assert!(!h.screen.is_awaiting_search());
    assert!(selection.is_empty());
    assert_eq!(selection.visibility(), DocumentVisibility::default());
}

#[test]
fn view_change_after_a_rejected_dispatch_keeps_the_selection() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    h.dispatcher.fail_from_now_on(DispatchError::Disconnected);
    h.screen.on_route(route("tokio", FOLDERS_VIEW));
    let selection = Arc::clone(&h.screen.context().selection);
    selection.select_documents([DocumentId(5)]);

    h.screen.on_route(route("tokio", CLOUD_VIEW));

    assert_eq!(h.screen.loads_issued(), 2);
    assert!(selection.is_document_selected(DocumentId(5)));
}

#[test]
fn change_tracking_stops_after_unmount() {
    let mut h = harness();
    assert!(!h.screen.take_changes());
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    assert!(h.screen.take_changes());
    assert!(!h.screen.take_changes());

    h.screen.unmount();
    assert!(!h.screen.is_mounted());
    h.screen.on_search_event(SearchEvent::Completed {
        sequence: 1,
        outcome: Ok(response()),
    });
    assert!(!h.screen.take_changes());
}

#[test]
fn text_rendering_lists_every_section() {
    let mut h = harness();
    h.screen.on_route(route("rust", FOLDERS_VIEW));
    let text = h.screen.render().to_text();
    for section in ["[form]", "[clusters-tabs]", "[docs-tabs]", "[clusters]", "[docs]", "[status]"] {
        assert!(text.contains(section), "missing {section} in {text}");
    }
    assert!(text.contains("*Folders"));
    assert!(text.contains("*Web"));
    assert!(text.contains("Searching web for \"rust\"..."));
}
