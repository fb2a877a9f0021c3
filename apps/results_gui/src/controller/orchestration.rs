//! Routing helpers from UI intents and worker events into the results screen.

use crossbeam_channel::Receiver;
use results_core::{bridge::SearchEvent, MemoryHistory, ResultsScreen};
use shared::domain::Theme;

use crate::controller::events::{UiError, UiErrorContext, UiIntent};

/// Applies one intent. Returns whether anything changed that needs a repaint.
pub fn apply_intent(screen: &mut ResultsScreen, history: &MemoryHistory, intent: UiIntent) -> bool {
    tracing::debug!(?intent, "applying ui intent");
    match intent {
        UiIntent::SelectClusterView(view) => screen.on_view_change(view),
        UiIntent::SelectSource(source) => screen.on_source_change(source),
        UiIntent::SubmitQuery => screen.submit_form(),
        UiIntent::Panel { view, action } => screen.on_panel_action(&view, action),
        UiIntent::Back => history.back(),
        UiIntent::Forward => history.forward(),
        UiIntent::ToggleTheme => {
            let theme = &screen.context().theme;
            theme.set(match theme.theme() {
                Theme::Light => Theme::Dark,
                Theme::Dark => Theme::Light,
            });
            true
        }
    }
}

/// Delivers every pending route and search event to the screen. Route parse
/// failures and worker failures are reported through `banner`.
pub fn pump(
    screen: &mut ResultsScreen,
    history: &MemoryHistory,
    events: &Receiver<SearchEvent>,
    banner: &mut Option<UiError>,
) -> bool {
    let mut applied = false;

    while let Some(route) = history.poll_route() {
        match route {
            Ok(params) => {
                screen.on_route(params);
                *banner = None;
                applied = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unparseable route");
                *banner = Some(UiError::from_message(
                    UiErrorContext::Navigation,
                    err.to_string(),
                ));
            }
        }
    }

    while let Ok(event) = events.try_recv() {
        if let SearchEvent::WorkerFailed(message) = &event {
            *banner = Some(UiError::from_message(
                UiErrorContext::BackendStartup,
                message.clone(),
            ));
        }
        applied |= screen.on_search_event(event);
    }

    applied
}
