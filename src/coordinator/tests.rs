//! Timing tests for the fetch coordinator
//!
//! All tests run on a paused clock: sleeping in the test advances virtual
//! time once every other task is idle, which makes debounce and fetch
//! ordering deterministic.

use super::{CoordinatorConfig, FetchCoordinator};
use crate::error::FetchError;
use crate::passes::source::parse_collection;
use crate::passes::{PassRecord, PassSource};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

const COLLECTION: &str = r#"[
    {"id": 1, "name": "a", "passNumbers": [5, 12]},
    {"id": 2, "name": "ab", "category": "VIP"},
    {"id": 3, "name": "xyz", "passNumbersStatus": [{"number": 40}]}
]"#;

/// One scripted response: wait `delay`, then answer with `body` or fail
#[derive(Clone)]
struct Step {
    delay: Duration,
    body: Result<String, String>,
}

impl Step {
    fn ok(delay_ms: u64, body: &str) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            body: Ok(body.to_string()),
        }
    }

    fn fail(delay_ms: u64, message: &str) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            body: Err(message.to_string()),
        }
    }
}

/// In-memory source answering fetches from a script, then from a fallback
struct ScriptedSource {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
}

impl ScriptedSource {
    fn new(script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
            fallback: Step::ok(0, COLLECTION),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PassSource for ScriptedSource {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<PassRecord>, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        Box::pin(async move {
            sleep(step.delay).await;
            match step.body {
                Ok(body) => parse_collection(&body),
                Err(message) => Err(FetchError::Transport(message)),
            }
        })
    }
}

fn start(source: &Arc<ScriptedSource>) -> FetchCoordinator {
    let source: Arc<dyn PassSource> = source.clone();
    FetchCoordinator::spawn(source, CoordinatorConfig::default())
}

fn result_names(coordinator: &FetchCoordinator) -> Vec<String> {
    coordinator
        .view()
        .results
        .iter()
        .map(|r| r.name.clone().unwrap_or_default())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_initial_load_is_immediate_and_unfiltered() {
    let source = ScriptedSource::new(vec![Step::ok(50, COLLECTION)]);
    let coordinator = start(&source);

    sleep(Duration::from_millis(1)).await;
    assert_eq!(source.calls(), 1, "initial fetch must not wait for the debounce");

    let view = coordinator.view();
    assert!(view.loading);
    assert!(!view.searching, "the initial load is not a search");

    sleep(Duration::from_millis(60)).await;
    let view = coordinator.view();
    assert!(!view.loading);
    assert_eq!(view.query, "");
    assert_eq!(view.generation, 1);
    assert_eq!(result_names(&coordinator), vec!["a", "ab", "xyz"]);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_changes_produces_one_fetch() {
    let source = ScriptedSource::new(vec![]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;
    assert_eq!(source.calls(), 1);

    coordinator.set_query("v");
    sleep(Duration::from_millis(100)).await;
    coordinator.set_query("vi");
    sleep(Duration::from_millis(100)).await;
    coordinator.set_query("vip");

    sleep(Duration::from_millis(299)).await;
    assert_eq!(source.calls(), 1, "no fetch before the quiet period ends");

    sleep(Duration::from_millis(2)).await;
    assert_eq!(source.calls(), 2);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(coordinator.view().query, "vip");
    assert_eq!(result_names(&coordinator), vec!["ab"]);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_late_response_for_older_query_is_dropped() {
    let source = ScriptedSource::new(vec![
        Step::ok(0, COLLECTION),    // initial load
        Step::ok(1000, COLLECTION), // "a": slow
        Step::ok(10, COLLECTION),   // "ab": fast
    ]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;

    coordinator.set_query("a");
    sleep(Duration::from_millis(301)).await;
    assert_eq!(source.calls(), 2);
    assert!(coordinator.view().searching);

    coordinator.set_query("ab");
    sleep(Duration::from_millis(301)).await;
    assert_eq!(source.calls(), 3);

    sleep(Duration::from_millis(50)).await;
    let view = coordinator.view();
    assert_eq!(view.query, "ab");
    assert_eq!(view.generation, 3);
    assert!(!view.searching);
    assert_eq!(result_names(&coordinator), vec!["ab"]);

    // The "a" fetch resolves now and must not overwrite the "ab" results
    sleep(Duration::from_millis(1000)).await;
    let view = coordinator.view();
    assert_eq!(view.query, "ab");
    assert_eq!(view.generation, 3);
    assert_eq!(result_names(&coordinator), vec!["ab"]);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_stale_initial_load_keeps_search_results() {
    let source = ScriptedSource::new(vec![
        Step::ok(2000, COLLECTION), // initial load, very slow
        Step::ok(0, COLLECTION),
    ]);
    let coordinator = start(&source);

    coordinator.set_query("12");
    sleep(Duration::from_millis(350)).await;

    let view = coordinator.view();
    assert!(!view.loading);
    assert_eq!(view.query, "12");
    assert_eq!(result_names(&coordinator), vec!["a"]);

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(coordinator.view().query, "12");
    assert_eq!(result_names(&coordinator), vec!["a"]);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_empty_query_returns_full_collection() {
    let source = ScriptedSource::new(vec![]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;

    coordinator.set_query("nothing matches this");
    sleep(Duration::from_millis(350)).await;
    assert!(coordinator.view().results.is_empty());

    coordinator.set_query("");
    sleep(Duration::from_millis(350)).await;
    let view = coordinator.view();
    assert_eq!(view.query, "");
    assert!(!view.searching);
    assert_eq!(result_names(&coordinator), vec!["a", "ab", "xyz"]);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_numeric_query_uses_pass_status_numbers() {
    let source = ScriptedSource::new(vec![]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;

    coordinator.set_query("40");
    sleep(Duration::from_millis(350)).await;
    assert_eq!(result_names(&coordinator), vec!["xyz"]);

    coordinator.set_query("5");
    sleep(Duration::from_millis(350)).await;
    assert_eq!(result_names(&coordinator), vec!["a"]);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_malformed_payload_yields_empty_results() {
    let source = ScriptedSource::new(vec![Step::ok(0, r#"{"passes": []}"#)]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;

    let view = coordinator.view();
    assert!(!view.loading);
    assert!(view.results.is_empty());
    assert_eq!(view.generation, 1);

    // The next successful fetch recovers
    coordinator.set_query("ab");
    sleep(Duration::from_millis(350)).await;
    assert_eq!(result_names(&coordinator), vec!["ab"]);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_yields_empty_results() {
    let source = ScriptedSource::new(vec![
        Step::ok(0, COLLECTION),
        Step::fail(20, "connection reset"),
    ]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;
    assert_eq!(coordinator.view().results.len(), 3);

    coordinator.set_query("a");
    sleep(Duration::from_millis(350)).await;

    let view = coordinator.view();
    assert!(view.results.is_empty());
    assert!(!view.searching);
    assert_eq!(view.query, "a");

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_garbage_body_yields_empty_results() {
    let source = ScriptedSource::new(vec![Step::ok(0, "<html>oops</html>")]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;

    let view = coordinator.view();
    assert!(!view.loading);
    assert!(view.results.is_empty());

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_repeating_the_same_query_does_not_refetch() {
    let source = ScriptedSource::new(vec![]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;

    coordinator.set_query("a");
    sleep(Duration::from_millis(350)).await;
    assert_eq!(source.calls(), 2);

    coordinator.set_query("a");
    sleep(Duration::from_millis(350)).await;
    assert_eq!(source.calls(), 2);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_searching_then_results() {
    let source = ScriptedSource::new(vec![Step::ok(0, COLLECTION), Step::ok(100, COLLECTION)]);
    let coordinator = start(&source);
    let mut updates = coordinator.subscribe();
    sleep(Duration::from_millis(10)).await;
    let _ = updates.borrow_and_update();

    coordinator.set_query("VIP");
    updates.changed().await.unwrap();
    {
        let view = updates.borrow_and_update();
        assert!(view.searching);
        assert_eq!(view.query, "", "results still belong to the previous fetch");
    }

    updates.changed().await.unwrap();
    let view = updates.borrow_and_update().clone();
    assert!(!view.searching);
    assert_eq!(view.query, "VIP");
    assert_eq!(view.results.len(), 1);

    coordinator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_with_fetch_in_flight() {
    let source = ScriptedSource::new(vec![Step::ok(5000, COLLECTION)]);
    let coordinator = start(&source);
    sleep(Duration::from_millis(10)).await;

    let updates = coordinator.subscribe();
    coordinator.shutdown().await;

    sleep(Duration::from_millis(6000)).await;
    assert!(updates.borrow().loading);
}
