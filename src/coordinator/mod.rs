//! Fetch Coordinator
//!
//! Turns a stream of query changes into debounced full-collection fetches and
//! publishes only the freshest result.
//!
//! All state lives in one task. Query changes arrive over a command channel;
//! timer expiries and fetch completions come back over an internal event
//! channel, so every mutation happens in one place. Each fetch is tagged with
//! a sequence number at issue time and its result is dropped on arrival if a
//! newer fetch has been issued since. Superseded requests are not cancelled
//! on the wire, they just finish unobserved.

pub mod debounce;
pub mod view;

#[cfg(test)]
mod tests;

use crate::error::FetchError;
use crate::passes::{PassRecord, PassSource};
use crate::search::apply_query;
use debounce::Debouncer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use view::SearchView;

/// Default quiet period before a query change triggers a fetch
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub debounce: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

enum Command {
    SetQuery(String),
}

enum Event {
    DebounceElapsed {
        generation: u64,
        query: String,
    },
    FetchCompleted {
        seq: u64,
        query: String,
        outcome: Result<Vec<PassRecord>, FetchError>,
    },
}

/// Handle to a running coordinator.
///
/// Dropping the handle stops the coordinator task.
pub struct FetchCoordinator {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<SearchView>,
    task: JoinHandle<()>,
}

impl FetchCoordinator {
    /// Start the coordinator. The initial load is issued right away with the
    /// empty query, without waiting for the debounce period.
    pub fn spawn(source: Arc<dyn PassSource>, config: CoordinatorConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(SearchView::initial());

        let coordinator = Coordinator {
            source,
            config,
            events: event_tx,
            view: view_tx,
            debouncer: Debouncer::new(),
            query: String::new(),
            latest_seq: 0,
        };

        let task = tokio::spawn(coordinator.run(command_rx, event_rx));

        Self {
            commands: command_tx,
            view: view_rx,
            task,
        }
    }

    /// Record a new query value. The fetch happens once the query has been
    /// left alone for the debounce period.
    pub fn set_query(&self, query: impl Into<String>) {
        if self.commands.send(Command::SetQuery(query.into())).is_err() {
            warn!("Query change ignored: coordinator has stopped");
        }
    }

    /// Snapshot of the current view
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every published change
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    /// Stop the coordinator and wait for its task to exit
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.task.await {
            warn!("Coordinator task ended abnormally: {}", e);
        }
    }
}

/// State owned by the coordinator task
struct Coordinator {
    source: Arc<dyn PassSource>,
    config: CoordinatorConfig,
    events: mpsc::UnboundedSender<Event>,
    view: watch::Sender<SearchView>,
    debouncer: Debouncer,
    /// Latest query received from the user
    query: String,
    /// Sequence number of the most recently issued fetch
    latest_seq: u64,
}

impl Coordinator {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        info!("Starting fetch coordinator");
        self.issue_fetch(String::new());

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::SetQuery(query)) => self.on_query_change(query),
                    None => break,
                },
                Some(event) = events.recv() => self.on_event(event),
            }
        }

        self.debouncer.cancel();
        info!("Fetch coordinator stopped");
    }

    fn on_query_change(&mut self, query: String) {
        if query == self.query {
            debug!(query = %query, "Query unchanged, nothing to schedule");
            return;
        }

        self.query = query.clone();
        let restarted = self.debouncer.is_pending();
        let events = self.events.clone();
        let generation = self.debouncer.schedule(self.config.debounce, move |generation| {
            let _ = events.send(Event::DebounceElapsed { generation, query });
        });

        debug!(generation, restarted, query = %self.query, "Debounce timer scheduled");
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::DebounceElapsed { generation, query } => {
                if !self.debouncer.is_current(generation) {
                    debug!(generation, "Ignoring superseded debounce timer");
                    return;
                }
                self.issue_fetch(query);
            }
            Event::FetchCompleted {
                seq,
                query,
                outcome,
            } => self.on_fetch_completed(seq, query, outcome),
        }
    }

    fn issue_fetch(&mut self, query: String) {
        self.latest_seq += 1;
        let seq = self.latest_seq;

        let searching = !query.is_empty();
        self.view.send_if_modified(|view| {
            let changed = view.searching != searching;
            view.searching = searching;
            changed
        });

        debug!(seq, query = %query, "Issuing fetch");

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_all().await;
            let _ = events.send(Event::FetchCompleted {
                seq,
                query,
                outcome,
            });
        });
    }

    fn on_fetch_completed(
        &mut self,
        seq: u64,
        query: String,
        outcome: Result<Vec<PassRecord>, FetchError>,
    ) {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "Discarding stale fetch result");
            return;
        }

        let records = match outcome {
            Ok(records) => records,
            Err(e) => {
                warn!(seq, error_code = e.error_code(), "Fetch failed: {}", e);
                Vec::new()
            }
        };

        let results = apply_query(&query, records);
        debug!(seq, query = %query, results = results.len(), "Publishing results");

        self.view.send_replace(SearchView {
            loading: false,
            searching: false,
            query,
            results: Arc::new(results),
            generation: seq,
        });
    }
}
