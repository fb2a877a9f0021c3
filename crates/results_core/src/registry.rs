//! View registry: which panels exist, how they are built and when they show.

use std::{collections::HashSet, fmt, sync::Arc};

use shared::domain::ViewId;

use crate::{
    error::RegistryError,
    node::{Node, PanelAction},
    selection::SelectionCoordinator,
    stores::{ClusterStore, SearchResultStore},
    ui_config::{ResultListConfigStore, ThemeStore},
};

/// Store references every panel receives at construction and render time.
#[derive(Clone)]
pub struct PanelContext {
    pub clusters: Arc<ClusterStore>,
    pub selection: Arc<SelectionCoordinator>,
    pub search_results: Arc<SearchResultStore>,
    pub theme: Arc<ThemeStore>,
    pub list_config: Arc<ResultListConfigStore>,
}

/// A mounted panel. It lives as long as the switcher that created it, so any
/// state it keeps survives being hidden.
pub trait PanelElement {
    fn render(&self, ctx: &PanelContext) -> Node;

    fn handle(&mut self, _action: &PanelAction, _ctx: &PanelContext) {}
}

pub type VisibilityPredicate = Arc<dyn Fn(Option<&ViewId>, &ViewDescriptor) -> bool>;

/// Capability set a view plugs into the registry with.
pub trait ViewImplementation {
    fn label(&self) -> &str;

    fn create_content_element(&self, ctx: &PanelContext) -> Box<dyn PanelElement>;

    /// Replaces the default `active == id` rule when `Some`.
    fn visibility_override(&self) -> Option<VisibilityPredicate> {
        None
    }
}

pub fn default_visibility() -> VisibilityPredicate {
    Arc::new(|active: Option<&ViewId>, descriptor: &ViewDescriptor| {
        active == Some(descriptor.id())
    })
}

pub struct ViewDescriptor {
    id: ViewId,
    is_visible: VisibilityPredicate,
    implementation: Arc<dyn ViewImplementation>,
}

impl ViewDescriptor {
    pub fn id(&self) -> &ViewId {
        &self.id
    }

    pub fn label(&self) -> &str {
        self.implementation.label()
    }

    pub fn is_visible(&self, active: Option<&ViewId>) -> bool {
        (self.is_visible)(active, self)
    }

    pub fn create_element(&self, ctx: &PanelContext) -> Box<dyn PanelElement> {
        self.implementation.create_content_element(ctx)
    }
}

impl fmt::Debug for ViewDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDescriptor")
            .field("id", &self.id)
            .field("label", &self.label())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: ViewId,
    pub label: String,
    pub active: bool,
}

/// Ordered, id-unique list of view descriptors. Order is tab order only.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    descriptors: Vec<ViewDescriptor>,
}

impl ViewRegistry {
    pub fn build(
        entries: impl IntoIterator<Item = (ViewId, Arc<dyn ViewImplementation>)>,
    ) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut descriptors = Vec::new();
        for (id, implementation) in entries {
            if !seen.insert(id.clone()) {
                return Err(RegistryError::DuplicateView(id));
            }
            let is_visible = implementation
                .visibility_override()
                .unwrap_or_else(default_visibility);
            descriptors.push(ViewDescriptor {
                id,
                is_visible,
                implementation,
            });
        }
        Ok(Self { descriptors })
    }

    pub fn get(&self, id: &ViewId) -> Option<&ViewDescriptor> {
        self.descriptors.iter().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &ViewId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<ViewId> {
        self.descriptors.iter().map(|d| d.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Ids of every descriptor whose predicate accepts `active`. Empty when
    /// `active` names no registered view and no predicate is permissive.
    pub fn visible_ids(&self, active: Option<&ViewId>) -> Vec<ViewId> {
        self.descriptors
            .iter()
            .filter(|d| d.is_visible(active))
            .map(|d| d.id.clone())
            .collect()
    }

    pub fn tabs(&self, active: Option<&ViewId>) -> Vec<Tab> {
        self.descriptors
            .iter()
            .map(|d| Tab {
                id: d.id.clone(),
                label: d.label().to_string(),
                active: active == Some(&d.id),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
