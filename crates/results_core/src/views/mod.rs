//! Built-in cluster and result views.

mod cloud;
mod folders;
mod result_list;

use std::sync::Arc;

use shared::domain::ViewId;

pub use cloud::CloudView;
pub use folders::FoldersView;
pub use result_list::ResultListView;

use crate::{
    error::RegistryError,
    registry::{ViewImplementation, ViewRegistry},
};

pub const FOLDERS_VIEW: &str = "folders";
pub const CLOUD_VIEW: &str = "cloud";
pub const LIST_VIEW: &str = "list";

pub fn cluster_views() -> Result<ViewRegistry, RegistryError> {
    ViewRegistry::build([
        (
            ViewId::from(FOLDERS_VIEW),
            Arc::new(FoldersView) as Arc<dyn ViewImplementation>,
        ),
        (
            ViewId::from(CLOUD_VIEW),
            Arc::new(CloudView::default()) as Arc<dyn ViewImplementation>,
        ),
    ])
}

pub fn results_views() -> Result<ViewRegistry, RegistryError> {
    ViewRegistry::build([(
        ViewId::from(LIST_VIEW),
        Arc::new(ResultListView) as Arc<dyn ViewImplementation>,
    )])
}

#[cfg(test)]
#[path = "../tests/views_tests.rs"]
mod tests;
