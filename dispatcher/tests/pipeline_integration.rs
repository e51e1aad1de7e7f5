//! End-to-end tests for the watch → notify pipeline with an in-memory transport.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use filealert_dispatcher::{
    CancellationToken, Config, Dispatcher, PipelineError, PipelineState, RunSummary,
    TransportConfig, WatcherError,
};
use filealert_notifier::{MailTransport, Notification};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

const SETTLE: Duration = Duration::from_millis(250);
const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Recording {
    sent: Mutex<Vec<Notification>>,
}

impl Recording {
    fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.subject.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailTransport for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, notification: &Notification) -> filealert_notifier::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn transport_config() -> TransportConfig {
    TransportConfig::new("me@example.com", "secret", "you@example.com")
}

fn dispatcher(root: &Path) -> Arc<Dispatcher<Recording>> {
    let config = Config::new(root, transport_config());
    Arc::new(Dispatcher::with_transport(config, Recording::default()).unwrap())
}

/// Spawn the run loop and wait until it is watching.
async fn spawn_run(
    dispatcher: &Arc<Dispatcher<Recording>>,
    cancel: &CancellationToken,
) -> JoinHandle<filealert_dispatcher::Result<RunSummary>> {
    let mut state = dispatcher.subscribe();
    let handle = tokio::spawn({
        let dispatcher = dispatcher.clone();
        let cancel = cancel.clone();
        async move { dispatcher.run(cancel).await }
    });
    state
        .wait_for(|s| *s == PipelineState::Watching)
        .await
        .unwrap();
    sleep(SETTLE).await;
    handle
}

async fn wait_for_sent(dispatcher: &Dispatcher<Recording>, count: usize) {
    timeout(WAIT, async {
        while dispatcher.notifier().transport().len() < count {
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("expected {count} notifications"));
}

#[tokio::test]
async fn test_file_then_nested_file_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().canonicalize().unwrap();
    let dispatcher = dispatcher(&root);
    let cancel = CancellationToken::new();
    let handle = spawn_run(&dispatcher, &cancel).await;

    std::fs::write(root.join("a.txt"), "a").unwrap();
    wait_for_sent(&dispatcher, 1).await;

    std::fs::create_dir(root.join("sub")).unwrap();
    sleep(SETTLE).await;
    std::fs::write(root.join("sub").join("b.txt"), "b").unwrap();
    wait_for_sent(&dispatcher, 2).await;

    // Give a stray directory notification a chance to show up.
    sleep(SETTLE).await;
    cancel.cancel();
    let summary = handle.await.unwrap().unwrap();

    let transport = dispatcher.notifier().transport();
    assert_eq!(
        transport.subjects(),
        vec!["New file created: a.txt", "New file created: b.txt"]
    );

    let sent = transport.sent.lock().unwrap();
    assert!(sent[1].body.contains(&format!(
        "Full path: {}",
        root.join("sub").join("b.txt").display()
    )));
    assert_eq!(sent[0].to, "you@example.com");
    assert_eq!(sent[0].from, "me@example.com");

    assert_eq!(summary.facts_observed, 2);
    assert_eq!(summary.notifications_sent, 2);
    assert_eq!(dispatcher.state(), PipelineState::Stopped);
}

#[tokio::test]
async fn test_cancel_while_idle_reaches_stopped_without_facts() {
    let temp_dir = TempDir::new().unwrap();
    let dispatcher = dispatcher(temp_dir.path());
    let cancel = CancellationToken::new();
    let mut state = dispatcher.subscribe();
    let handle = spawn_run(&dispatcher, &cancel).await;

    cancel.cancel();
    let summary = timeout(WAIT, handle).await.unwrap().unwrap().unwrap();

    assert_eq!(summary, RunSummary::default());
    assert_eq!(dispatcher.notifier().transport().len(), 0);
    assert_eq!(*state.borrow_and_update(), PipelineState::Stopped);

    // Files created after the stop are never picked up.
    std::fs::write(temp_dir.path().join("late.txt"), "late").unwrap();
    sleep(SETTLE).await;
    assert_eq!(dispatcher.notifier().transport().len(), 0);
}

#[tokio::test]
async fn test_lifecycle_passes_through_every_state() {
    let temp_dir = TempDir::new().unwrap();
    let dispatcher = dispatcher(temp_dir.path());
    let cancel = CancellationToken::new();

    let mut rx = dispatcher.subscribe();
    let seen = tokio::spawn(async move {
        let mut seen = vec![*rx.borrow_and_update()];
        while rx.changed().await.is_ok() {
            let state = *rx.borrow_and_update();
            seen.push(state);
            if state == PipelineState::Stopped {
                break;
            }
        }
        seen
    });

    let handle = spawn_run(&dispatcher, &cancel).await;
    cancel.cancel();
    handle.await.unwrap().unwrap();

    let seen = timeout(WAIT, seen).await.unwrap().unwrap();
    // Stopping and Stopped can coalesce in a watch channel; the last value is authoritative.
    assert_eq!(seen.first(), Some(&PipelineState::Idle));
    assert_eq!(seen.last(), Some(&PipelineState::Stopped));
    assert!(seen.contains(&PipelineState::Watching));
}

#[tokio::test]
async fn test_missing_root_fails_before_watching() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::new(temp_dir.path().join("missing"), transport_config());

    let result = Dispatcher::with_transport(config, Recording::default());
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[tokio::test]
async fn test_root_deleted_before_run_is_a_watch_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("watched");
    std::fs::create_dir(&root).unwrap();
    let dispatcher = dispatcher(&root);

    std::fs::remove_dir(&root).unwrap();
    let err = dispatcher.run(CancellationToken::new()).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Watch(WatcherError::RootNotFound(_))
    ));
    assert_eq!(dispatcher.state(), PipelineState::Idle);
    assert_eq!(dispatcher.notifier().transport().len(), 0);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_root_removed_while_running_stops_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("watched");
    std::fs::create_dir(&root).unwrap();
    let dispatcher = dispatcher(&root);
    let cancel = CancellationToken::new();
    let handle = spawn_run(&dispatcher, &cancel).await;

    std::fs::remove_dir(&root).unwrap();
    let result = timeout(WAIT, handle).await.unwrap().unwrap();

    assert!(matches!(
        result,
        Err(PipelineError::Watch(WatcherError::RootRemoved(_)))
    ));
    assert_eq!(dispatcher.state(), PipelineState::Stopped);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_root_renamed_away_while_running_stops_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("watched");
    std::fs::create_dir(&root).unwrap();
    let dispatcher = dispatcher(&root);
    let cancel = CancellationToken::new();
    let handle = spawn_run(&dispatcher, &cancel).await;

    std::fs::rename(&root, temp_dir.path().join("moved")).unwrap();
    let result = timeout(WAIT, handle).await.unwrap().unwrap();

    assert!(matches!(
        result,
        Err(PipelineError::Watch(WatcherError::RootRemoved(_)))
    ));
    assert_eq!(dispatcher.state(), PipelineState::Stopped);
}
