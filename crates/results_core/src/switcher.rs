//! Mounts every registered panel once and exposes only the visible ones.

use std::sync::Arc;

use shared::domain::ViewId;
use tracing::{debug, warn};

use crate::{
    node::{Node, PanelAction},
    registry::{PanelContext, PanelElement, ViewRegistry},
};

#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePanel {
    pub id: ViewId,
    pub content: Node,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwitcherOutput {
    pub visible: Vec<VisiblePanel>,
    /// Mounted panels excluded from this render.
    pub hidden: Vec<ViewId>,
}

impl SwitcherOutput {
    pub fn visible_ids(&self) -> Vec<ViewId> {
        self.visible.iter().map(|panel| panel.id.clone()).collect()
    }
}

struct MountedPanel {
    id: ViewId,
    element: Box<dyn PanelElement>,
}

/// Hidden panels keep their element (and so their internal state) alive.
/// Which and how many panels are visible is decided by the descriptors'
/// predicates alone.
pub struct PanelSwitcher {
    registry: Arc<ViewRegistry>,
    mounted: Vec<MountedPanel>,
}

impl PanelSwitcher {
    pub fn new(registry: Arc<ViewRegistry>) -> Self {
        Self {
            registry,
            mounted: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ViewRegistry> {
        &self.registry
    }

    /// Creates the element of every descriptor not mounted yet.
    pub fn mount_all(&mut self, ctx: &PanelContext) {
        for descriptor in self.registry.iter() {
            if self.mounted.iter().any(|m| &m.id == descriptor.id()) {
                continue;
            }
            debug!(view = %descriptor.id(), "mounting panel");
            self.mounted.push(MountedPanel {
                id: descriptor.id().clone(),
                element: descriptor.create_element(ctx),
            });
        }
    }

    pub fn is_mounted(&self, id: &ViewId) -> bool {
        self.mounted.iter().any(|m| &m.id == id)
    }

    pub fn mounted_ids(&self) -> Vec<ViewId> {
        self.mounted.iter().map(|m| m.id.clone()).collect()
    }

    pub fn render(&mut self, active: Option<&ViewId>, ctx: &PanelContext) -> SwitcherOutput {
        self.mount_all(ctx);

        let mut output = SwitcherOutput::default();
        for mounted in &self.mounted {
            let visible = self
                .registry
                .get(&mounted.id)
                .is_some_and(|descriptor| descriptor.is_visible(active));
            if visible {
                output.visible.push(VisiblePanel {
                    id: mounted.id.clone(),
                    content: mounted.element.render(ctx),
                });
            } else {
                output.hidden.push(mounted.id.clone());
            }
        }
        output
    }

    /// Routes an action to the mounted panel `id`. Returns `false` when no such
    /// panel is mounted.
    pub fn dispatch(&mut self, id: &ViewId, action: &PanelAction, ctx: &PanelContext) -> bool {
        self.mount_all(ctx);
        match self.mounted.iter_mut().find(|m| &m.id == id) {
            Some(mounted) => {
                mounted.element.handle(action, ctx);
                true
            }
            None => {
                warn!(view = %id, ?action, "action for unknown panel ignored");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/switcher_tests.rs"]
mod tests;
