use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;
use results_core::{
    backend::BackendKind,
    bridge::{self, SearchEvent},
    build_screen,
    config::{load_settings, load_settings_from, Settings},
    node::PanelAction,
    routes::search,
    MemoryHistory, ResultsScreen, RouteParams,
};
use shared::domain::{ClusterId, SourceId, ViewId};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Runs one search through the results screen and prints what it shows")]
struct Args {
    /// Settings file; defaults to ./results.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Full search route, e.g. /search/web/rust/folders. Overrides the
    /// source, query and view flags.
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long)]
    view: Option<String>,
    /// static or http
    #[arg(long, default_value = "static")]
    backend: BackendKind,
    /// Clusters to select after the results arrive.
    #[arg(long = "select-cluster")]
    select_clusters: Vec<i64>,
    #[arg(long)]
    show_settings: bool,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

fn initial_route(args: &Args, settings: &Settings) -> Result<RouteParams> {
    if let Some(url) = &args.url {
        return Ok(search::parse_url(url)?);
    }
    let defaults = settings.initial_route();
    Ok(RouteParams {
        source: args
            .source
            .as_deref()
            .map(SourceId::from)
            .unwrap_or(defaults.source),
        query: args.query.clone(),
        view: args
            .view
            .as_deref()
            .map(ViewId::from)
            .unwrap_or(defaults.view),
    })
}

/// Feeds queued routes to the screen and waits for every search they start.
/// A load the dispatcher rejected has already failed, so nothing is awaited.
fn settle(
    screen: &mut ResultsScreen,
    history: &MemoryHistory,
    events: &Receiver<SearchEvent>,
    timeout: Duration,
) -> Result<()> {
    while let Some(route) = history.poll_route() {
        screen.on_route(route?);
        while screen.is_awaiting_search() {
            let event = events
                .recv_timeout(timeout)
                .context("timed out waiting for search results")?;
            screen.on_search_event(event);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => {
            load_settings_from(Some(path.as_path()), |name| std::env::var(name).ok())?
        }
        None => load_settings()?,
    };
    let route = initial_route(&args, &settings)?;
    info!(url = %search::build_url(&route), "starting search");

    let history = Arc::new(MemoryHistory::new(search::build_url(&route)));
    let worker = bridge::launch(args.backend, &settings)?;
    let mut screen = build_screen(&settings, Arc::new(worker.dispatcher()), history.clone())?;
    let timeout = Duration::from_secs(args.timeout_secs);

    settle(&mut screen, &history, worker.events(), timeout)?;

    let Some(view) = screen.params().map(|params| params.view.clone()) else {
        bail!("no route reached the results screen");
    };
    for id in &args.select_clusters {
        if !screen.on_panel_action(&view, PanelAction::ToggleCluster(ClusterId(*id))) {
            bail!("view {view} is not a cluster view; cannot select cluster {id}");
        }
    }

    print!("{}", screen.render().to_text());
    if args.show_settings {
        print!("{}", screen.source_settings()?.to_text());
    }

    screen.unmount();
    worker.shutdown();
    Ok(())
}
