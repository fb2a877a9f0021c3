//! Bridge between the UI thread's search-result store and the backend worker.
//!
//! Loads travel to the worker as [`BackendCommand`]s over a bounded channel and
//! come back as [`SearchEvent`]s that the UI thread applies to the store. The
//! worker runs each search as its own task, so completions may arrive out of
//! order; the store's sequence check sorts that out.

use std::{sync::Arc, thread};

use anyhow::Result;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use shared::protocol::SearchResponse;
use tracing::{debug, error, info};

use crate::{
    backend::{BackendKind, SearchBackend},
    config::Settings,
    error::DispatchError,
    stores::{LoadTicket, SearchDispatch},
};

pub const COMMAND_QUEUE_CAPACITY: usize = 256;
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Search(LoadTicket),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Completed {
        sequence: u64,
        outcome: Result<SearchResponse, String>,
    },
    WorkerFailed(String),
}

/// [`SearchDispatch`] that queues tickets for the worker thread.
#[derive(Clone)]
pub struct ChannelDispatcher {
    cmd_tx: Sender<BackendCommand>,
}

impl ChannelDispatcher {
    pub fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        Self { cmd_tx }
    }
}

impl SearchDispatch for ChannelDispatcher {
    fn dispatch(&self, ticket: LoadTicket) -> Result<(), DispatchError> {
        let sequence = ticket.sequence;
        match self.cmd_tx.try_send(BackendCommand::Search(ticket)) {
            Ok(()) => {
                debug!(sequence, "queued search command");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(DispatchError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(DispatchError::Disconnected),
        }
    }
}

pub struct SearchWorker {
    cmd_tx: Sender<BackendCommand>,
    events: Receiver<SearchEvent>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SearchWorker {
    pub fn dispatcher(&self) -> ChannelDispatcher {
        ChannelDispatcher::new(self.cmd_tx.clone())
    }

    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    pub fn try_next_event(&self) -> Option<SearchEvent> {
        self.events.try_recv().ok()
    }

    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(BackendCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("search worker panicked during shutdown");
            }
        }
    }
}

pub fn spawn_search_worker(backend: Arc<dyn SearchBackend>) -> SearchWorker {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(COMMAND_QUEUE_CAPACITY);
    let (event_tx, events) = bounded::<SearchEvent>(EVENT_QUEUE_CAPACITY);
    let handle = thread::spawn(move || run_worker(backend, cmd_rx, event_tx));
    SearchWorker {
        cmd_tx,
        events,
        handle: Some(handle),
    }
}

/// Builds the chosen backend from `settings` and starts a worker running it.
pub fn launch(kind: BackendKind, settings: &Settings) -> Result<SearchWorker> {
    let backend = kind.build(settings)?;
    info!(backend = %kind, "starting search worker");
    Ok(spawn_search_worker(backend))
}

fn run_worker(
    backend: Arc<dyn SearchBackend>,
    cmd_rx: Receiver<BackendCommand>,
    event_tx: Sender<SearchEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to build search worker runtime: {err}");
            let _ = event_tx.try_send(SearchEvent::WorkerFailed(format!(
                "search worker startup failure: {err}"
            )));
            return;
        }
    };
    info!("search worker ready");

    let mut tasks = Vec::new();
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::Search(ticket) => {
                let backend = Arc::clone(&backend);
                let event_tx = event_tx.clone();
                tasks.push(runtime.spawn(async move {
                    let outcome = backend
                        .search(&ticket.request)
                        .await
                        .map_err(|err| format!("{err:#}"));
                    let _ = event_tx.send(SearchEvent::Completed {
                        sequence: ticket.sequence,
                        outcome,
                    });
                }));
                tasks.retain(|task| !task.is_finished());
            }
            BackendCommand::Shutdown => break,
        }
    }

    runtime.block_on(async {
        for task in tasks {
            let _ = task.await;
        }
    });
    info!("search worker stopped");
}

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod tests;
