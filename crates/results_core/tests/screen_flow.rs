use std::{sync::Arc, time::Duration};

use results_core::{
    backend::StaticSearchBackend,
    bridge::{spawn_search_worker, SearchWorker},
    build_screen,
    config::Settings,
    node::PanelAction,
    routes::search,
    MemoryHistory, ResultsScreen, RouteParams,
};
use shared::domain::{ClusterId, ViewId};

struct Session {
    history: Arc<MemoryHistory>,
    worker: SearchWorker,
    screen: ResultsScreen,
}

impl Session {
    fn start(initial: &RouteParams) -> Session {
        let history = Arc::new(MemoryHistory::new(search::build_url(initial)));
        let backend = StaticSearchBackend::sample().expect("sample corpus");
        let worker = spawn_search_worker(Arc::new(backend));
        let screen = build_screen(
            &Settings::default(),
            Arc::new(worker.dispatcher()),
            history.clone(),
        )
        .expect("screen");
        let mut session = Session {
            history,
            worker,
            screen,
        };
        session.settle();
        session
    }

    /// Delivers pending routes, then waits for the search each one triggered.
    fn settle(&mut self) {
        while let Some(route) = self.history.poll_route() {
            let before = self.screen.loads_issued();
            self.screen.on_route(route.expect("valid route"));
            if self.screen.loads_issued() > before {
                let event = self
                    .worker
                    .events()
                    .recv_timeout(Duration::from_secs(5))
                    .expect("search event");
                assert!(self.screen.on_search_event(event));
            }
        }
    }
}

#[test]
fn browsing_session_round_trips_through_history() {
    let mut session = Session::start(&RouteParams::new("web", "rust", "folders"));

    let view = session.screen.render();
    assert!(view.status.ends_with("results for \"rust\""), "{}", view.status);
    assert!(!view.clusters.visible.is_empty());
    assert_eq!(session.screen.loads_issued(), 1);

    session.screen.on_view_change(ViewId::from("cloud"));
    session.settle();
    assert_eq!(session.screen.loads_issued(), 1);
    assert_eq!(
        session.history.current().as_deref(),
        Some("/search/web/rust/cloud")
    );

    session.screen.on_query_change("clustering");
    session.settle();
    assert_eq!(session.screen.loads_issued(), 2);
    let view = session.screen.render();
    assert_eq!(view.query_draft, "clustering");
    assert_eq!(
        view.documents.visible[0].content.item_labels(),
        vec!["Clustering search results", "Suffix tree clustering"]
    );

    assert!(session.history.back());
    session.settle();
    assert_eq!(session.screen.loads_issued(), 3);
    assert_eq!(
        session.screen.params(),
        Some(&RouteParams::new("web", "rust", "cloud"))
    );

    session.worker.shutdown();
}

#[test]
fn cluster_selection_filters_documents_until_the_next_search() {
    let mut session = Session::start(&RouteParams::new("web", "rust", "folders"));
    let folders = ViewId::from("folders");

    session
        .screen
        .on_panel_action(&folders, PanelAction::ToggleCluster(ClusterId(2)));
    let labels = session.screen.render().documents.visible[0]
        .content
        .item_labels();
    assert_eq!(labels, vec!["Rust (fungus)", "Wheat stem rust"]);

    session.screen.on_query_change("tokio");
    session.settle();
    assert!(session.screen.context().selection.is_empty());

    session.worker.shutdown();
}
