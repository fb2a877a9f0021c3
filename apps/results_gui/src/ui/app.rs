use std::{sync::Arc, time::Duration};

use crossbeam_channel::Receiver;
use results_core::{
    bridge::{SearchEvent, SearchWorker},
    MemoryHistory, ResultsScreen, ScreenView,
};
use shared::domain::Theme;

use crate::{
    controller::{
        events::{UiError, UiErrorContext, UiIntent},
        orchestration::{apply_intent, pump},
    },
    ui::{
        nodes::show_node,
        theme::{toggle_label, visuals_for_theme},
    },
};

pub struct ResultsApp {
    screen: ResultsScreen,
    history: Arc<MemoryHistory>,
    events: Receiver<SearchEvent>,
    worker: Option<SearchWorker>,
    banner: Option<UiError>,
    applied_theme: Option<Theme>,
}

impl ResultsApp {
    pub fn new(screen: ResultsScreen, history: Arc<MemoryHistory>, worker: SearchWorker) -> Self {
        Self {
            screen,
            history,
            events: worker.events().clone(),
            worker: Some(worker),
            banner: None,
            applied_theme: None,
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        let theme = self.screen.context().theme.theme();
        if self.applied_theme == Some(theme) {
            return;
        }
        ctx.set_visuals(visuals_for_theme(theme));
        self.applied_theme = Some(theme);
    }

    fn show_search_bar(&mut self, ctx: &egui::Context, view: &ScreenView, intents: &mut Vec<UiIntent>) {
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.history.can_go_back(), egui::Button::new("Back"))
                    .clicked()
                {
                    intents.push(UiIntent::Back);
                }
                if ui
                    .add_enabled(self.history.can_go_forward(), egui::Button::new("Forward"))
                    .clicked()
                {
                    intents.push(UiIntent::Forward);
                }

                let edit = ui.add(
                    egui::TextEdit::singleline(self.screen.form_mut().draft_mut())
                        .hint_text("Search")
                        .desired_width(360.0),
                );
                let enter_pressed =
                    edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Search").clicked() || enter_pressed {
                    intents.push(UiIntent::SubmitQuery);
                }

                ui.separator();
                for source in &view.sources {
                    let button = egui::Button::new(source.label.as_str()).selected(source.active);
                    if ui.add(button).clicked() && !source.active {
                        intents.push(UiIntent::SelectSource(source.id.clone()));
                    }
                }

                ui.separator();
                let theme = self.screen.context().theme.theme();
                if ui.button(toggle_label(theme)).clicked() {
                    intents.push(UiIntent::ToggleTheme);
                }
            });
            if let Some(banner) = &self.banner {
                ui.colored_label(ui.visuals().error_fg_color, banner.banner_text());
            }
            ui.add_space(4.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context, view: &ScreenView) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(egui::RichText::new(&view.status).weak());
        });
    }

    fn show_cluster_panel(&self, ctx: &egui::Context, view: &ScreenView, intents: &mut Vec<UiIntent>) {
        egui::SidePanel::left("clusters_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tab in &view.cluster_tabs {
                        let button = egui::Button::new(tab.label.as_str()).selected(tab.active);
                        if ui.add(button).clicked() && !tab.active {
                            intents.push(UiIntent::SelectClusterView(tab.id.clone()));
                        }
                    }
                });
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_salt("clusters_scroll")
                    .show(ui, |ui| {
                        if view.clusters.visible.is_empty() {
                            ui.weak("No cluster view selected");
                        }
                        for panel in &view.clusters.visible {
                            show_node(ui, &panel.content, Some(&panel.id), intents);
                        }
                    });
            });
    }

    fn show_source_settings(&self, ctx: &egui::Context) {
        egui::SidePanel::right("source_settings_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| match self.screen.source_settings() {
                Ok(node) => show_node(ui, &node, None, &mut Vec::new()),
                Err(err) => {
                    let error = UiError::from_message(UiErrorContext::SourceSettings, err.to_string());
                    ui.colored_label(ui.visuals().error_fg_color, error.banner_text());
                }
            });
    }

    fn show_documents(&self, ctx: &egui::Context, view: &ScreenView, intents: &mut Vec<UiIntent>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in &view.result_tabs {
                    ui.add(egui::Button::new(tab.label.as_str()).selected(tab.active));
                }
            });
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("documents_scroll")
                .show(ui, |ui| {
                    for panel in &view.documents.visible {
                        show_node(ui, &panel.content, Some(&panel.id), intents);
                    }
                });
        });
    }
}

impl eframe::App for ResultsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        pump(&mut self.screen, &self.history, &self.events, &mut self.banner);
        self.apply_theme_if_needed(ctx);

        let view = self.screen.render();
        let mut intents = Vec::new();
        self.show_search_bar(ctx, &view, &mut intents);
        self.show_status_bar(ctx, &view);
        self.show_cluster_panel(ctx, &view, &mut intents);
        self.show_source_settings(ctx);
        self.show_documents(ctx, &view, &mut intents);

        for intent in intents {
            apply_intent(&mut self.screen, &self.history, intent);
        }

        if self.screen.take_changes() || self.screen.context().search_results.snapshot().is_loading()
        {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl Drop for ResultsApp {
    fn drop(&mut self) {
        self.screen.unmount();
        if let Some(worker) = self.worker.take() {
            worker.shutdown();
        }
    }
}
