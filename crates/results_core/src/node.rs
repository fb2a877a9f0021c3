//! Framework-neutral render tree produced by panels and the results screen.
//!
//! Hosts translate a [`Node`] into widgets (egui) or text; clickable items carry
//! the [`PanelAction`] to route back to the panel that produced them.

use std::fmt::Write as _;

use shared::domain::{ClusterId, DocumentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    ToggleCluster(ClusterId),
    ToggleExpanded(ClusterId),
    ToggleDocument(DocumentId),
    ClearClusterSelection,
    ScrollBy(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disclosure {
    pub expanded: bool,
    pub action: PanelAction,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemNode {
    pub label: String,
    pub detail: Option<String>,
    pub selected: bool,
    pub action: Option<PanelAction>,
    pub disclosure: Option<Disclosure>,
    pub children: Vec<Node>,
}

impl ItemNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn on_click(mut self, action: PanelAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn disclosure(mut self, expanded: bool, action: PanelAction) -> Self {
        self.disclosure = Some(Disclosure { expanded, action });
        self
    }

    pub fn children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Empty,
    Text(String),
    Heading(String),
    Item(ItemNode),
    Group(Vec<Node>),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn heading(value: impl Into<String>) -> Self {
        Self::Heading(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Group(children) => children.iter().all(Node::is_empty),
            _ => false,
        }
    }

    /// Labels of every item in the tree, depth first.
    pub fn item_labels(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_labels(self, &mut out);
        out
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self, 0);
        out
    }
}

fn collect_labels(node: &Node, out: &mut Vec<String>) {
    match node {
        Node::Item(item) => {
            out.push(item.label.clone());
            for child in &item.children {
                collect_labels(child, out);
            }
        }
        Node::Group(children) => {
            for child in children {
                collect_labels(child, out);
            }
        }
        Node::Empty | Node::Text(_) | Node::Heading(_) => {}
    }
}

pub(crate) fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Empty => {}
        Node::Text(text) => {
            let _ = writeln!(out, "{indent}{text}");
        }
        Node::Heading(text) => {
            let _ = writeln!(out, "{indent}## {text}");
        }
        Node::Item(item) => {
            let marker = if item.selected { "[x]" } else { "[ ]" };
            let fold = match item.disclosure {
                Some(Disclosure { expanded: true, .. }) => "v ",
                Some(Disclosure {
                    expanded: false, ..
                }) => "> ",
                None => "",
            };
            let _ = write!(out, "{indent}{marker} {fold}{}", item.label);
            if let Some(detail) = &item.detail {
                let _ = write!(out, " - {detail}");
            }
            out.push('\n');
            for child in &item.children {
                write_node(out, child, depth + 1);
            }
        }
        Node::Group(children) => {
            for child in children {
                write_node(out, child, depth);
            }
        }
    }
}
