//! Configured search sources and their settings panels.

use std::{collections::HashSet, sync::Arc};

use shared::domain::SourceId;

use crate::{
    error::{RegistryError, SourceError},
    node::{ItemNode, Node},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptionChange {
    pub source: SourceId,
    pub results: u32,
}

/// Options passed to a source's settings renderer. `on_change` is the only
/// recognised option.
pub struct SourceConfigOptions {
    pub on_change: Box<dyn Fn(SourceOptionChange)>,
}

impl SourceConfigOptions {
    pub fn new(on_change: impl Fn(SourceOptionChange) + 'static) -> Self {
        Self {
            on_change: Box::new(on_change),
        }
    }

    pub fn noop() -> Self {
        Self::new(|_| {})
    }
}

pub trait SourceConfigurator {
    fn label(&self) -> &str;

    fn create_source_config(&self, options: SourceConfigOptions) -> Node;
}

/// A source described entirely by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredSource {
    pub id: SourceId,
    pub label: String,
    pub results: u32,
    pub allowed_results: Vec<u32>,
}

impl SourceConfigurator for ConfiguredSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn create_source_config(&self, _options: SourceConfigOptions) -> Node {
        let mut nodes = vec![Node::text("Results per request")];
        nodes.extend(self.allowed_results.iter().map(|count| {
            Node::Item(ItemNode::new(count.to_string()).selected(*count == self.results))
        }));
        Node::Group(nodes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChoice {
    pub id: SourceId,
    pub label: String,
    pub active: bool,
}

#[derive(Default)]
pub struct SourceCatalog {
    entries: Vec<(SourceId, Arc<dyn SourceConfigurator>)>,
}

impl SourceCatalog {
    pub fn build(
        entries: impl IntoIterator<Item = (SourceId, Arc<dyn SourceConfigurator>)>,
    ) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (id, source) in entries {
            if !seen.insert(id.clone()) {
                return Err(RegistryError::DuplicateSource(id));
            }
            out.push((id, source));
        }
        Ok(Self { entries: out })
    }

    pub fn get(&self, id: &SourceId) -> Result<&dyn SourceConfigurator, SourceError> {
        self.entries
            .iter()
            .find(|(source_id, _)| source_id == id)
            .map(|(_, source)| source.as_ref())
            .ok_or_else(|| SourceError::UnknownSource(id.clone()))
    }

    pub fn contains(&self, id: &SourceId) -> bool {
        self.get(id).is_ok()
    }

    pub fn label(&self, id: &SourceId) -> Result<&str, SourceError> {
        self.get(id).map(|source| source.label())
    }

    pub fn ids(&self) -> Vec<SourceId> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn choices(&self, active: &SourceId) -> Vec<SourceChoice> {
        self.entries
            .iter()
            .map(|(id, source)| SourceChoice {
                id: id.clone(),
                label: source.label().to_string(),
                active: id == active,
            })
            .collect()
    }

    /// Settings panel for `id`. An unknown id is a configuration error and is
    /// returned as such instead of rendering an empty panel.
    pub fn settings_panel(
        &self,
        id: &SourceId,
        options: SourceConfigOptions,
    ) -> Result<Node, SourceError> {
        let source = self.get(id)?;
        Ok(Node::Group(vec![
            Node::heading(format!("{} search options", source.label())),
            source.create_source_config(options),
        ]))
    }
}

#[cfg(test)]
#[path = "tests/sources_tests.rs"]
mod tests;
