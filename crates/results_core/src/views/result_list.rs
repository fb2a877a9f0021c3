use crate::{
    node::{ItemNode, Node, PanelAction},
    registry::{PanelContext, PanelElement, ViewImplementation},
};

/// Document list filtered by the current cluster selection.
pub struct ResultListView;

impl ViewImplementation for ResultListView {
    fn label(&self) -> &str {
        "List"
    }

    fn create_content_element(&self, _ctx: &PanelContext) -> Box<dyn PanelElement> {
        Box::new(ResultListPanel)
    }
}

struct ResultListPanel;

impl PanelElement for ResultListPanel {
    fn render(&self, ctx: &PanelContext) -> Node {
        let config = ctx.list_config.config();
        let visibility = ctx.selection.visibility();

        ctx.search_results.with_state(|state| {
            let visible: Vec<_> = state
                .documents
                .iter()
                .enumerate()
                .filter(|(_, doc)| visibility.is_visible(doc.id))
                .collect();
            if visible.is_empty() {
                return Node::text("No documents");
            }

            let mut nodes = vec![Node::text(format!(
                "{} of {} documents",
                visible.len(),
                state.documents.len()
            ))];
            nodes.extend(visible.into_iter().map(|(rank, doc)| {
                let label = if config.show_rank {
                    format!("{}. {}", rank + 1, doc.title)
                } else {
                    doc.title.clone()
                };
                let mut item = ItemNode::new(label)
                    .selected(ctx.selection.is_document_selected(doc.id))
                    .on_click(PanelAction::ToggleDocument(doc.id));
                let mut detail = Vec::new();
                if config.show_snippets && !doc.snippet.is_empty() {
                    detail.push(doc.snippet.clone());
                }
                if config.show_urls {
                    if let Some(url) = &doc.url {
                        detail.push(url.clone());
                    }
                }
                if !detail.is_empty() {
                    item = item.detail(detail.join(" | "));
                }
                Node::Item(item)
            }));
            Node::Group(nodes)
        })
    }

    fn handle(&mut self, action: &PanelAction, ctx: &PanelContext) {
        if let PanelAction::ToggleDocument(id) = *action {
            ctx.selection.toggle_document(id);
        }
    }
}
