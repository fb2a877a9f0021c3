//! Types shared between the results browser core, its backends and the apps.

pub mod domain;
pub mod error;
pub mod protocol;
