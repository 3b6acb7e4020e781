use balatro_watch::detector::{ChangeDetector, MarkerKind};
use balatro_watch::reader::{PersistentReadError, ReadSnapshot, RetryPolicy, SnapshotReader};
use balatro_watch::snapshot::GameSnapshot;
use balatro_watch::watcher::{Phase, PollingLoop, StateHandle, TickOutcome};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

/// Counts how often the loop actually reads the file, and the loop phase
/// seen during each read once a handle is attached.
#[derive(Default)]
struct CountingReader {
    reads: Cell<u32>,
    handle: RefCell<Option<StateHandle>>,
    phases: RefCell<Vec<Phase>>,
}

impl ReadSnapshot for CountingReader {
    fn read(&self, path: &Path) -> Result<GameSnapshot, PersistentReadError> {
        self.reads.set(self.reads.get() + 1);
        if let Some(handle) = self.handle.borrow().as_ref() {
            self.phases.borrow_mut().push(handle.phase());
        }
        SnapshotReader::new(RetryPolicy::new(1, Duration::ZERO)).read(path)
    }
}

fn content_loop(path: &Path) -> PollingLoop<CountingReader> {
    PollingLoop::new(
        path.to_path_buf(),
        Duration::from_millis(10),
        ChangeDetector::new(MarkerKind::Content),
        CountingReader::default(),
    )
}

#[test]
fn unchanged_file_is_not_reread() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"current_hand":[{"rank":"2","suit":"Clubs"}]}"#).unwrap();

    let mut polling = content_loop(&path);
    assert!(matches!(polling.tick(), TickOutcome::Updated(_)));
    for _ in 0..3 {
        assert!(matches!(polling.tick(), TickOutcome::Unchanged));
    }
    assert_eq!(polling.reader().reads.get(), 1);

    fs::write(&path, r#"{"current_hand":[{"rank":"3","suit":"Clubs"}]}"#).unwrap();
    assert!(matches!(polling.tick(), TickOutcome::Updated(_)));
    assert_eq!(polling.reader().reads.get(), 2);
}

#[test]
fn deleted_file_waits_but_keeps_last_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"current_hand":[{"rank":"King","suit":"Spades"}]}"#).unwrap();

    let mut polling = content_loop(&path);
    let handle = polling.handle();
    assert!(matches!(polling.tick(), TickOutcome::Updated(_)));

    fs::remove_file(&path).unwrap();
    assert!(matches!(polling.tick(), TickOutcome::WaitingForFile));
    assert_eq!(handle.phase(), Phase::WaitingForFile);
    assert!(handle.latest_state().is_some());
    assert_eq!(handle.analyze_hand().map(|c| c.card_count), Some(1));
    assert_eq!(polling.reader().reads.get(), 1);

    // Same content reappearing matches the retained marker.
    fs::write(&path, r#"{"current_hand":[{"rank":"King","suit":"Spades"}]}"#).unwrap();
    assert!(matches!(polling.tick(), TickOutcome::Unchanged));
    assert_eq!(handle.phase(), Phase::Watching);
}

#[test]
fn empty_file_is_a_failed_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "   ").unwrap();

    let mut polling = content_loop(&path);
    let handle = polling.handle();
    assert!(matches!(polling.tick(), TickOutcome::ReadFailed(_)));
    assert!(handle.latest_state().is_none());
    assert!(handle.view().marker().is_none());
    assert!(handle.view().last_error().is_some());
}

#[test]
fn reader_runs_in_reading_phase() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"current_hand":[]}"#).unwrap();

    let mut polling = content_loop(&path);
    let handle = polling.handle();
    polling.reader().handle.replace(Some(handle.clone()));
    assert!(matches!(polling.tick(), TickOutcome::Updated(_)));
    assert_eq!(*polling.reader().phases.borrow(), vec![Phase::Reading]);
    assert_eq!(handle.phase(), Phase::Watching);
}

#[test]
fn error_clears_once_the_file_is_readable_again() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let state = r#"{"current_hand":[{"rank":"Queen","suit":"Hearts"}]}"#;
    fs::write(&path, state).unwrap();

    let mut polling = content_loop(&path);
    let handle = polling.handle();
    assert!(matches!(polling.tick(), TickOutcome::Updated(_)));
    let marker = handle.view().marker().copied();

    // A path that cannot be probed goes through the reader's retries.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    assert!(matches!(polling.tick(), TickOutcome::ReadFailed(_)));
    assert_eq!(polling.reader().reads.get(), 2);
    assert!(handle.view().last_error().is_some());
    assert_eq!(handle.view().marker().copied(), marker);

    fs::remove_dir(&path).unwrap();
    fs::write(&path, state).unwrap();
    for _ in 0..3 {
        assert!(matches!(polling.tick(), TickOutcome::Unchanged));
    }
    assert!(handle.view().last_error().is_none());
    assert_eq!(polling.reader().reads.get(), 2);
    assert_eq!(handle.analyze_hand().map(|c| c.card_count), Some(1));
}

#[test]
fn error_clears_while_waiting_for_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{").unwrap();

    let mut polling = content_loop(&path);
    let handle = polling.handle();
    assert!(matches!(polling.tick(), TickOutcome::ReadFailed(_)));
    assert!(handle.view().last_error().is_some());

    fs::remove_file(&path).unwrap();
    assert!(matches!(polling.tick(), TickOutcome::WaitingForFile));
    assert!(handle.view().last_error().is_none());
}
