use std::cmp::Ordering;

use shared::protocol::Cluster;

use crate::{
    node::{ItemNode, Node, PanelAction},
    registry::{PanelContext, PanelElement, ViewImplementation},
};

const DEFAULT_PAGE_SIZE: usize = 20;

/// Flat, score-ordered view of the top-level clusters, paged.
pub struct CloudView {
    page_size: usize,
}

impl Default for CloudView {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CloudView {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }
}

impl ViewImplementation for CloudView {
    fn label(&self) -> &str {
        "Cloud"
    }

    fn create_content_element(&self, _ctx: &PanelContext) -> Box<dyn PanelElement> {
        Box::new(CloudPanel {
            offset: 0,
            page_size: self.page_size,
        })
    }
}

struct CloudPanel {
    offset: usize,
    page_size: usize,
}

fn by_score(a: &&Cluster, b: &&Cluster) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.label.cmp(&b.label))
}

impl PanelElement for CloudPanel {
    fn render(&self, ctx: &PanelContext) -> Node {
        ctx.clusters.with_clusters(|clusters| {
            if clusters.is_empty() {
                return Node::text("No clusters");
            }
            let mut ranked: Vec<&Cluster> = clusters.iter().collect();
            ranked.sort_by(by_score);

            let start = self.offset.min(ranked.len().saturating_sub(1));
            let end = (start + self.page_size).min(ranked.len());
            let mut nodes = Vec::new();
            if start > 0 {
                nodes.push(Node::Item(
                    ItemNode::new("Previous").on_click(PanelAction::ScrollBy(-(self.page_size as i32))),
                ));
            }
            nodes.extend(ranked[start..end].iter().map(|cluster| {
                Node::Item(
                    ItemNode::new(cluster.label.clone())
                        .detail(format!("{:.2}", cluster.score))
                        .selected(ctx.selection.is_cluster_selected(cluster.id))
                        .on_click(PanelAction::ToggleCluster(cluster.id)),
                )
            }));
            if end < ranked.len() {
                nodes.push(Node::Item(
                    ItemNode::new("More").on_click(PanelAction::ScrollBy(self.page_size as i32)),
                ));
            }
            nodes.push(Node::text(format!(
                "Clusters {}-{} of {}",
                start + 1,
                end,
                ranked.len()
            )));
            Node::Group(nodes)
        })
    }

    fn handle(&mut self, action: &PanelAction, ctx: &PanelContext) {
        match *action {
            PanelAction::ToggleCluster(id) => ctx.selection.toggle_cluster(id),
            PanelAction::ClearClusterSelection => ctx.selection.clear_clusters(),
            PanelAction::ScrollBy(delta) => {
                let len = ctx.clusters.with_clusters(<[Cluster]>::len);
                let next = self.offset as i64 + i64::from(delta);
                let max = len.saturating_sub(1) as i64;
                self.offset = next.clamp(0, max.max(0)) as usize;
            }
            PanelAction::ToggleExpanded(_) | PanelAction::ToggleDocument(_) => {}
        }
    }
}
