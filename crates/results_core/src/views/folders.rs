use std::collections::BTreeSet;

use shared::{domain::ClusterId, protocol::Cluster};

use crate::{
    node::{ItemNode, Node, PanelAction},
    registry::{PanelContext, PanelElement, ViewImplementation},
};

/// Hierarchical cluster list with expandable subclusters.
pub struct FoldersView;

impl ViewImplementation for FoldersView {
    fn label(&self) -> &str {
        "Folders"
    }

    fn create_content_element(&self, _ctx: &PanelContext) -> Box<dyn PanelElement> {
        Box::new(FoldersPanel::default())
    }
}

#[derive(Default)]
struct FoldersPanel {
    expanded: BTreeSet<ClusterId>,
}

impl FoldersPanel {
    fn cluster_node(&self, cluster: &Cluster, ctx: &PanelContext) -> Node {
        let mut item = ItemNode::new(cluster.label.clone())
            .detail(format!("{} docs", cluster.all_documents().len()))
            .selected(ctx.selection.is_cluster_selected(cluster.id))
            .on_click(PanelAction::ToggleCluster(cluster.id));

        if !cluster.subclusters.is_empty() {
            let expanded = self.expanded.contains(&cluster.id);
            item = item.disclosure(expanded, PanelAction::ToggleExpanded(cluster.id));
            if expanded {
                item = item.children(
                    cluster
                        .subclusters
                        .iter()
                        .map(|sub| self.cluster_node(sub, ctx))
                        .collect(),
                );
            }
        }
        Node::Item(item)
    }
}

impl PanelElement for FoldersPanel {
    fn render(&self, ctx: &PanelContext) -> Node {
        ctx.clusters.with_clusters(|clusters| {
            if clusters.is_empty() {
                return Node::text("No clusters");
            }
            let mut nodes = vec![Node::Item(
                ItemNode::new("All documents")
                    .selected(ctx.selection.cluster_selection().is_empty())
                    .on_click(PanelAction::ClearClusterSelection),
            )];
            nodes.extend(clusters.iter().map(|cluster| self.cluster_node(cluster, ctx)));
            Node::Group(nodes)
        })
    }

    fn handle(&mut self, action: &PanelAction, ctx: &PanelContext) {
        match *action {
            PanelAction::ToggleCluster(id) => ctx.selection.toggle_cluster(id),
            PanelAction::ClearClusterSelection => ctx.selection.clear_clusters(),
            PanelAction::ToggleExpanded(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
            }
            PanelAction::ToggleDocument(_) | PanelAction::ScrollBy(_) => {}
        }
    }
}
