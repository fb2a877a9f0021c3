use super::*;

use std::{cell::RefCell, rc::Rc};

fn configured(id: &str, label: &str) -> (SourceId, Arc<dyn SourceConfigurator>) {
    let source: Arc<dyn SourceConfigurator> = Arc::new(ConfiguredSource {
        id: SourceId::from(id),
        label: label.to_string(),
        results: 100,
        allowed_results: vec![50, 100, 200],
    });
    (SourceId::from(id), source)
}

fn catalog() -> SourceCatalog {
    SourceCatalog::build([configured("web", "Web"), configured("pubmed", "PubMed")])
        .expect("catalog")
}

#[test]
fn unknown_source_is_an_error() {
    let catalog = catalog();
    let missing = SourceId::from("arxiv");
    assert_eq!(
        catalog.settings_panel(&missing, SourceConfigOptions::noop()).err(),
        Some(SourceError::UnknownSource(missing.clone()))
    );
    assert!(catalog.get(&missing).is_err());
    assert!(!catalog.contains(&missing));
}

#[test]
fn settings_panel_is_headed_by_the_source_label() {
    let catalog = catalog();
    let panel = catalog
        .settings_panel(&SourceId::from("pubmed"), SourceConfigOptions::noop())
        .expect("panel");
    let text = panel.to_text();
    assert!(text.starts_with("## PubMed search options\n"), "{text}");
    assert!(text.contains("[x] 100"), "{text}");
    assert!(text.contains("[ ] 50"), "{text}");
    assert_eq!(panel.item_labels(), vec!["50", "100", "200"]);
}

#[test]
fn duplicate_sources_are_rejected() {
    let err = SourceCatalog::build([configured("web", "Web"), configured("web", "Web again")])
        .err()
        .expect("duplicate");
    assert_eq!(err, RegistryError::DuplicateSource(SourceId::from("web")));
}

#[test]
fn choices_mark_the_active_source() {
    let catalog = catalog();
    let choices = catalog.choices(&SourceId::from("pubmed"));
    assert_eq!(choices.len(), 2);
    assert!(!choices[0].active);
    assert!(choices[1].active);
    assert_eq!(catalog.label(&SourceId::from("web")), Ok("Web"));
    assert_eq!(catalog.ids(), vec![SourceId::from("web"), SourceId::from("pubmed")]);
}

#[test]
fn options_callback_is_not_invoked_while_rendering() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let options = SourceConfigOptions::new(move |change| sink.borrow_mut().push(change));
    catalog()
        .settings_panel(&SourceId::from("web"), options)
        .expect("panel");
    assert!(calls.borrow().is_empty());
}
