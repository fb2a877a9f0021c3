//! Error types for the results browser core.

use std::{path::PathBuf, string::FromUtf8Error};

use shared::domain::{SourceId, ViewId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("not a search route: {0}")]
    NotASearchRoute(String),
    #[error("search route is missing the {0} segment")]
    MissingSegment(&'static str),
    #[error("search route {segment} segment {value:?} is not a slug")]
    InvalidSlug { segment: &'static str, value: String },
    #[error("search route segment {segment} is not valid UTF-8 after decoding: {source}")]
    Encoding {
        segment: &'static str,
        source: FromUtf8Error,
    },
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("view {0} is registered more than once")]
    DuplicateView(ViewId),
    #[error("source {0} is registered more than once")]
    DuplicateSource(SourceId),
}

/// Raised when a source id has no configuration. This is a configuration
/// defect, so callers are expected to surface it rather than render nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("unknown search source: {0}")]
    UnknownSource(SourceId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("at least one search source must be configured")]
    NoSources,
    #[error("default source {0} is not among the configured sources")]
    UnknownDefaultSource(SourceId),
    #[error("default result count {default} is not among the allowed counts {allowed:?}")]
    InvalidDefaultResultCount { default: u32, allowed: Vec<u32> },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("search command queue is full; please retry")]
    QueueFull,
    #[error("search worker disconnected (possible startup/runtime failure)")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no search endpoint configured for source {0}")]
    NoEndpoint(SourceId),
    #[error("search backend responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unknown backend {0:?}; expected static or http")]
    UnknownKind(String),
}
