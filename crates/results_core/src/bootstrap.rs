//! Wires configuration, stores and view registries into a [`ResultsScreen`].

use std::sync::Arc;

use crate::{
    config::Settings,
    error::ConfigError,
    routes::Navigator,
    screen::{ResultsScreen, ScreenDependencies},
    selection::SelectionCoordinator,
    stores::{SearchDispatch, SearchResultStore},
    ui_config::{ResultListConfigStore, ThemeStore},
    views,
};

pub fn build_screen(
    settings: &Settings,
    dispatcher: Arc<dyn SearchDispatch>,
    navigator: Arc<dyn Navigator>,
) -> Result<ResultsScreen, ConfigError> {
    let search_results = SearchResultStore::new(dispatcher)
        .with_result_counts(settings.result_counts(), settings.default_result_count);

    Ok(ResultsScreen::new(ScreenDependencies {
        cluster_views: Arc::new(views::cluster_views()?),
        results_views: Arc::new(views::results_views()?),
        sources: Arc::new(settings.source_catalog()?),
        search_results: Arc::new(search_results),
        selection: Arc::new(SelectionCoordinator::new()),
        theme: Arc::new(ThemeStore::new(settings.theme)),
        list_config: Arc::new(ResultListConfigStore::default()),
        navigator,
    }))
}
