//! UI intents and error modeling for the results GUI.

use results_core::node::PanelAction;
use shared::domain::{SourceId, ViewId};

/// What the user asked for during a frame. Collected while drawing and
/// applied once drawing is done.
#[derive(Debug, Clone, PartialEq)]
pub enum UiIntent {
    SelectClusterView(ViewId),
    SelectSource(SourceId),
    SubmitQuery,
    Panel { view: ViewId, action: PanelAction },
    Back,
    Forward,
    ToggleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Navigation,
    SourceSettings,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("unknown search source")
            || lower.contains("registered more than once")
            || lower.contains("config")
        {
            UiErrorCategory::Configuration
        } else if lower.contains("not a search route")
            || lower.contains("missing")
            || lower.contains("invalid")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timeout")
            || lower.contains("connection")
            || lower.contains("unreachable")
            || lower.contains("disconnect")
            || lower.contains("worker")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::BackendStartup => "Search worker",
            UiErrorContext::Navigation => "Navigation",
            UiErrorContext::SourceSettings => "Source settings",
            UiErrorContext::General => "Error",
        };
        format!("{prefix}: {}", self.message())
    }
}
