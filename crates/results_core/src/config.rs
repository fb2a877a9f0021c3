use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use shared::domain::{SourceId, Theme, ViewId};
use tracing::{info, warn};

use crate::{
    error::ConfigError,
    routes::RouteParams,
    sources::{ConfiguredSource, SourceCatalog, SourceConfigurator},
    views::FOLDERS_VIEW,
};

pub const DEFAULT_CONFIG_FILE: &str = "results.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSettings {
    pub id: SourceId,
    pub label: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub results: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub default_source: SourceId,
    pub default_view: ViewId,
    pub sources: Vec<SourceSettings>,
    pub allowed_result_counts: Vec<u32>,
    pub default_result_count: u32,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_source: SourceId::from("web"),
            default_view: ViewId::from(FOLDERS_VIEW),
            sources: vec![
                SourceSettings {
                    id: SourceId::from("web"),
                    label: "Web".into(),
                    endpoint: None,
                    results: None,
                },
                SourceSettings {
                    id: SourceId::from("pubmed"),
                    label: "PubMed".into(),
                    endpoint: None,
                    results: None,
                },
            ],
            allowed_result_counts: vec![50, 100, 200],
            default_result_count: 100,
            theme: Theme::Light,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    default_source: Option<String>,
    default_view: Option<String>,
    #[serde(default)]
    sources: Vec<SourceSettings>,
    allowed_result_counts: Option<Vec<u32>>,
    default_result_count: Option<u32>,
    theme: Option<Theme>,
}

/// Loads `results.toml` from the working directory when present, then applies
/// `APP__*` environment overrides.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = PathBuf::from(DEFAULT_CONFIG_FILE);
    let file = path.exists().then_some(path.as_path());
    load_settings_from(file, |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some(path) = path {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        apply_file_config(&mut settings, toml::from_str::<FileConfig>(&raw)?);
        info!(path = %path.display(), "loaded results settings");
    }

    apply_env_overrides(&mut settings, env);
    settings.validate()?;
    Ok(settings)
}

fn apply_file_config(settings: &mut Settings, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.default_source {
        settings.default_source = SourceId::from(v);
    }
    if let Some(v) = file_cfg.default_view {
        settings.default_view = ViewId::from(v);
    }
    if !file_cfg.sources.is_empty() {
        settings.sources = file_cfg.sources;
    }
    if let Some(v) = file_cfg.allowed_result_counts {
        settings.allowed_result_counts = v;
    }
    if let Some(v) = file_cfg.default_result_count {
        settings.default_result_count = v;
    }
    if let Some(v) = file_cfg.theme {
        settings.theme = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("APP__DEFAULT_SOURCE") {
        settings.default_source = SourceId::from(v);
    }
    if let Some(v) = env("APP__DEFAULT_VIEW") {
        settings.default_view = ViewId::from(v);
    }
    if let Some(v) = env("APP__DEFAULT_RESULT_COUNT") {
        let min = settings.allowed_result_counts.iter().copied().min().unwrap_or(1);
        let max = settings.allowed_result_counts.iter().copied().max().unwrap_or(u32::MAX);
        settings.default_result_count =
            parse_bounded(Some(&v), settings.default_result_count, min, max);
    }
    if let Some(v) = env("APP__THEME") {
        match v.trim().to_ascii_lowercase().as_str() {
            "light" => settings.theme = Theme::Light,
            "dark" => settings.theme = Theme::Dark,
            other => warn!(theme = other, "ignoring unknown APP__THEME value"),
        }
    }
}

/// Fail-safe integer parsing: missing, malformed or out-of-range input yields
/// `default`.
pub fn parse_bounded(raw: Option<&str>, default: u32, min: u32, max: u32) -> u32 {
    match raw.map(|v| v.trim().parse::<u32>()) {
        Some(Ok(value)) if (min..=max).contains(&value) => value,
        _ => default,
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if !self.sources.iter().any(|s| s.id == self.default_source) {
            return Err(ConfigError::UnknownDefaultSource(self.default_source.clone()));
        }
        if !self.allowed_result_counts.contains(&self.default_result_count) {
            return Err(ConfigError::InvalidDefaultResultCount {
                default: self.default_result_count,
                allowed: self.allowed_result_counts.clone(),
            });
        }
        Ok(())
    }

    /// Result count requested for `source`: its configured count when that is
    /// one of the allowed counts, otherwise the default.
    pub fn result_count_for(&self, source: &SourceId) -> u32 {
        self.sources
            .iter()
            .find(|s| &s.id == source)
            .and_then(|s| s.results)
            .filter(|count| self.allowed_result_counts.contains(count))
            .unwrap_or(self.default_result_count)
    }

    pub fn result_counts(&self) -> HashMap<SourceId, u32> {
        self.sources
            .iter()
            .map(|s| (s.id.clone(), self.result_count_for(&s.id)))
            .collect()
    }

    pub fn endpoints(&self) -> HashMap<SourceId, String> {
        self.sources
            .iter()
            .filter_map(|s| s.endpoint.clone().map(|endpoint| (s.id.clone(), endpoint)))
            .collect()
    }

    pub fn initial_route(&self) -> RouteParams {
        RouteParams {
            source: self.default_source.clone(),
            query: String::new(),
            view: self.default_view.clone(),
        }
    }

    pub fn source_catalog(&self) -> Result<SourceCatalog, ConfigError> {
        let entries = self.sources.iter().map(|s| {
            let source: Arc<dyn SourceConfigurator> = Arc::new(ConfiguredSource {
                id: s.id.clone(),
                label: s.label.clone(),
                results: self.result_count_for(&s.id),
                allowed_results: self.allowed_result_counts.clone(),
            });
            (s.id.clone(), source)
        });
        Ok(SourceCatalog::build(entries)?)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
