//! Orchestration core of the search results browser.
//!
//! Route parameters come in from a router, [`orchestrator::SearchOrchestrator`]
//! decides when they warrant a search, [`switcher::PanelSwitcher`] keeps every
//! registered view mounted while showing the active one, and
//! [`selection::SelectionCoordinator`] keeps cluster and document selection
//! consistent with the current result set.

pub mod backend;
pub mod bootstrap;
pub mod bridge;
pub mod config;
pub mod error;
pub mod node;
pub mod orchestrator;
pub mod registry;
pub mod routes;
pub mod screen;
pub mod selection;
pub mod sources;
pub mod stores;
pub mod switcher;
pub mod ui_config;
pub mod views;

pub use bootstrap::build_screen;
pub use routes::{MemoryHistory, Navigator, RouteParams};
pub use screen::{ResultsScreen, ScreenView};
