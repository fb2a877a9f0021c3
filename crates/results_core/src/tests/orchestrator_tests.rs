use super::*;

use std::sync::Mutex;

use shared::domain::SourceId;

#[derive(Default)]
struct RecordingLoader {
    calls: Mutex<Vec<(SourceId, String)>>,
}

impl RecordingLoader {
    fn calls(&self) -> Vec<(SourceId, String)> {
        self.calls.lock().expect("lock").clone()
    }
}

impl SearchLoader for RecordingLoader {
    fn load(&self, source: &SourceId, query: &str) {
        self.calls
            .lock()
            .expect("lock")
            .push((source.clone(), query.to_string()));
    }
}

fn orchestrator() -> (Arc<RecordingLoader>, SearchOrchestrator) {
    let loader = Arc::new(RecordingLoader::default());
    let orchestrator = SearchOrchestrator::new(loader.clone());
    (loader, orchestrator)
}

#[test]
fn mount_issues_exactly_one_load() {
    let (loader, mut orchestrator) = orchestrator();
    orchestrator.on_mount(&RouteParams::new("web", "rust", "folders"));
    assert_eq!(loader.calls(), vec![(SourceId::from("web"), "rust".to_string())]);
    assert_eq!(orchestrator.loads_issued(), 1);
}

#[test]
fn view_only_change_does_not_search() {
    let (loader, mut orchestrator) = orchestrator();
    let prev = RouteParams::new("web", "rust", "folders");
    let next = prev.with_view("cloud".into());
    assert!(!requires_search(&prev, &next));
    assert!(!orchestrator.on_params_changed(&prev, &next));
    assert!(loader.calls().is_empty());
}

#[test]
fn query_or_source_change_searches_with_new_params() {
    let (loader, mut orchestrator) = orchestrator();
    let prev = RouteParams::new("web", "rust", "folders");

    let by_query = prev.with_query("tokio");
    assert!(orchestrator.on_params_changed(&prev, &by_query));

    let by_source = by_query.with_source("pubmed".into());
    assert!(orchestrator.on_params_changed(&by_query, &by_source));

    assert_eq!(
        loader.calls(),
        vec![
            (SourceId::from("web"), "tokio".to_string()),
            (SourceId::from("pubmed"), "tokio".to_string()),
        ]
    );
}

#[test]
fn identical_params_do_not_search() {
    let (loader, mut orchestrator) = orchestrator();
    let params = RouteParams::new("web", "rust", "folders");
    assert!(!orchestrator.on_params_changed(&params, &params.clone()));
    assert!(loader.calls().is_empty());
}

#[test]
fn reverting_to_an_earlier_query_searches_again() {
    let (loader, mut orchestrator) = orchestrator();
    let a = RouteParams::new("web", "rust", "folders");
    let b = a.with_query("tokio");

    orchestrator.on_mount(&a);
    orchestrator.on_params_changed(&a, &b);
    orchestrator.on_params_changed(&b, &a);

    assert_eq!(loader.calls().len(), 3);
    assert_eq!(orchestrator.loads_issued(), 3);
    assert_eq!(loader.calls()[2], (SourceId::from("web"), "rust".to_string()));
}
