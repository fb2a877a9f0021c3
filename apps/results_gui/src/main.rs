use std::{path::PathBuf, sync::Arc};

mod controller;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use results_core::{
    backend::BackendKind,
    bridge, build_screen,
    config::{load_settings, load_settings_from},
    routes::search,
    MemoryHistory,
};

use crate::ui::ResultsApp;

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; defaults to ./results.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Route to open first, e.g. /search/web/rust/folders.
    #[arg(long)]
    url: Option<String>,
    /// static or http
    #[arg(long, default_value = "static")]
    backend: BackendKind,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => {
            load_settings_from(Some(path.as_path()), |name| std::env::var(name).ok())?
        }
        None => load_settings()?,
    };
    let initial_url = match args.url {
        Some(url) => url,
        None => search::build_url(&settings.initial_route()),
    };

    let history = Arc::new(MemoryHistory::new(initial_url));
    let worker = bridge::launch(args.backend, &settings)?;
    let screen = build_screen(&settings, Arc::new(worker.dispatcher()), history.clone())?;
    let app = ResultsApp::new(screen, history, worker);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Search Results")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Search Results",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow!("results gui exited with an error: {err}"))
}
