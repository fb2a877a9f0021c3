//! Draws a results-core render tree with egui widgets.

use results_core::node::{ItemNode, Node};
use shared::domain::ViewId;

use crate::controller::events::UiIntent;

/// Draws `node`. Clicks on actionable items are queued as intents addressed
/// to the panel `view`; `view` is `None` for read-only trees.
pub fn show_node(ui: &mut egui::Ui, node: &Node, view: Option<&ViewId>, intents: &mut Vec<UiIntent>) {
    match node {
        Node::Empty => {}
        Node::Text(text) => {
            ui.weak(text);
        }
        Node::Heading(text) => {
            ui.heading(text);
        }
        Node::Item(item) => show_item(ui, item, view, intents),
        Node::Group(children) => {
            for child in children {
                show_node(ui, child, view, intents);
            }
        }
    }
}

fn show_item(ui: &mut egui::Ui, item: &ItemNode, view: Option<&ViewId>, intents: &mut Vec<UiIntent>) {
    let mut push = |action| {
        if let Some(view) = view {
            intents.push(UiIntent::Panel {
                view: view.clone(),
                action,
            });
        }
    };

    ui.horizontal(|ui| {
        if let Some(disclosure) = item.disclosure {
            let icon = if disclosure.expanded { "-" } else { "+" };
            if ui.small_button(icon).clicked() {
                push(disclosure.action);
            }
        }
        let button = egui::Button::new(item.label.as_str()).selected(item.selected);
        let clicked = ui.add_enabled(item.action.is_some(), button).clicked();
        if clicked {
            if let Some(action) = item.action {
                push(action);
            }
        }
    });
    if let Some(detail) = &item.detail {
        ui.indent(("detail", &item.label), |ui| {
            ui.small(detail.as_str());
        });
    }
    if !item.children.is_empty() {
        ui.indent(("children", &item.label), |ui| {
            for child in &item.children {
                show_node(ui, child, view, intents);
            }
        });
    }
}
