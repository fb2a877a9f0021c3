//! UI layer for the results GUI: app shell, node rendering, and theme.

pub mod app;
pub mod nodes;
pub mod theme;

pub use app::ResultsApp;
