//! Small UI preference stores handed to panels through the panel context.

use shared::domain::Theme;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ThemeStore {
    theme: watch::Sender<Theme>,
}

impl ThemeStore {
    pub fn new(theme: Theme) -> Self {
        let (theme, _) = watch::channel(theme);
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn set(&self, theme: Theme) {
        self.theme.send_if_modified(|current| {
            let changed = *current != theme;
            *current = theme;
            changed
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultListConfig {
    pub show_snippets: bool,
    pub show_urls: bool,
    pub show_rank: bool,
}

impl Default for ResultListConfig {
    fn default() -> Self {
        Self {
            show_snippets: true,
            show_urls: true,
            show_rank: false,
        }
    }
}

#[derive(Debug)]
pub struct ResultListConfigStore {
    config: watch::Sender<ResultListConfig>,
}

impl Default for ResultListConfigStore {
    fn default() -> Self {
        Self::new(ResultListConfig::default())
    }
}

impl ResultListConfigStore {
    pub fn new(config: ResultListConfig) -> Self {
        let (config, _) = watch::channel(config);
        Self { config }
    }

    pub fn config(&self) -> ResultListConfig {
        *self.config.borrow()
    }

    pub fn update(&self, f: impl FnOnce(&mut ResultListConfig)) {
        self.config.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultListConfig> {
        self.config.subscribe()
    }
}
