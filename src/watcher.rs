//! The polling loop and the state it publishes.
//!
//! [`PollingLoop`] owns the only writer side of [`WatchState`]. Consumers
//! get a cloneable [`StateHandle`] that can only read. Marker and snapshot
//! live behind the same lock and are replaced together, so a reader never
//! sees one without the other.

use crate::classifier::{classify, Classification};
use crate::config::WatchConfig;
use crate::detector::{ChangeDetector, Marker, Probe};
use crate::reader::{PersistentReadError, ReadSnapshot, SnapshotReader};
use crate::snapshot::GameSnapshot;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::{Duration, Instant};

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// The snapshot file does not exist (yet, or any more).
    #[default]
    WaitingForFile,
    /// The file exists and is probed each tick.
    Watching,
    /// The reader is running, retries included.
    Reading,
}

/// What a single tick did.
#[derive(Debug)]
#[non_exhaustive]
pub enum TickOutcome {
    WaitingForFile,
    Unchanged,
    Updated(Arc<GameSnapshot>),
    /// The reader exhausted its retries; the previous state is kept.
    ReadFailed(PersistentReadError),
}

/// Latest successfully parsed snapshot and the marker it was read at.
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    marker: Option<Marker>,
    snapshot: Option<Arc<GameSnapshot>>,
    phase: Phase,
    updated_at: Option<DateTime<Local>>,
    last_error: Option<String>,
    updates: u64,
}

impl WatchState {
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Arc<GameSnapshot>> {
        self.snapshot.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Local time of the last successful read.
    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    /// Most recent persistent read failure, cleared by the next successful
    /// probe or read.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of successful reads so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// `marker` is `None` when the file could not be probed; the next tick
    /// then sees a change and reads again.
    fn accept(&mut self, marker: Option<Marker>, snapshot: Arc<GameSnapshot>) {
        self.marker = marker;
        self.snapshot = Some(snapshot);
        self.updated_at = Some(Local::now());
        self.last_error = None;
        self.updates += 1;
    }
}

/// Read-only, cloneable view of the loop's [`WatchState`].
#[derive(Debug, Clone, Default)]
pub struct StateHandle {
    inner: Arc<RwLock<WatchState>>,
}

impl StateHandle {
    fn read(&self) -> RwLockReadGuard<'_, WatchState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WatchState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The latest snapshot, or `None` before the first successful read.
    pub fn latest_state(&self) -> Option<Arc<GameSnapshot>> {
        self.read().snapshot.clone()
    }

    /// Classify the latest hand. `None` when there is no snapshot or the
    /// snapshot has no cards in hand.
    pub fn analyze_hand(&self) -> Option<Classification> {
        let snapshot = self.latest_state()?;
        snapshot.has_cards().then(|| classify(&snapshot.current_hand))
    }

    /// A consistent copy of the whole state.
    pub fn view(&self) -> WatchState {
        self.read().clone()
    }

    pub fn phase(&self) -> Phase {
        self.read().phase
    }
}

/// Drives change detection and reading on a fixed cadence.
#[derive(Debug)]
pub struct PollingLoop<R = SnapshotReader> {
    path: PathBuf,
    interval: Duration,
    detector: ChangeDetector,
    reader: R,
    state: StateHandle,
}

impl PollingLoop<SnapshotReader> {
    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(
            config.snapshot_path.clone(),
            config.poll_interval,
            ChangeDetector::new(config.marker),
            SnapshotReader::new(config.retry),
        )
    }
}

impl<R: ReadSnapshot> PollingLoop<R> {
    /// Longest uninterrupted sleep, so a stop request is honoured promptly.
    const STOP_CHECK: Duration = Duration::from_millis(50);

    pub fn new(path: PathBuf, interval: Duration, detector: ChangeDetector, reader: R) -> Self {
        Self { path, interval, detector, reader, state: StateHandle::default() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn handle(&self) -> StateHandle {
        self.state.clone()
    }

    /// One iteration: probe, and read if the file changed.
    ///
    /// A probe that fails for a reason other than absence is treated as a
    /// change, so the reader's retry budget decides whether it is reported.
    pub fn tick(&mut self) -> TickOutcome {
        let last = self.state.read().marker;
        let marker = match self.detector.probe(&self.path, last.as_ref()) {
            Ok(Probe::Absent) => {
                self.settle(Phase::WaitingForFile);
                return TickOutcome::WaitingForFile;
            }
            Ok(Probe::Unchanged(_)) => {
                self.settle(Phase::Watching);
                log::debug!("no change in {}", self.path.display());
                return TickOutcome::Unchanged;
            }
            Ok(Probe::Changed(marker)) => Some(marker),
            Err(err) => {
                log::warn!("cannot probe {}, reading anyway: {err}", self.path.display());
                None
            }
        };

        self.enter(Phase::Reading);
        let outcome = match self.reader.read(&self.path) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.state.write().accept(marker, Arc::clone(&snapshot));
                match marker {
                    Some(m) => log::info!(
                        "game state updated ({m}, {} cards in hand)",
                        snapshot.current_hand.len()
                    ),
                    None => log::info!(
                        "game state updated ({} cards in hand)",
                        snapshot.current_hand.len()
                    ),
                }
                TickOutcome::Updated(snapshot)
            }
            Err(err) => {
                log::error!("{err}");
                self.state.write().last_error = Some(err.to_string());
                TickOutcome::ReadFailed(err)
            }
        };
        self.enter(Phase::Watching);
        outcome
    }

    /// A probe succeeded without needing a read: any earlier failure is over.
    fn settle(&self, phase: Phase) {
        self.enter(phase);
        self.state.write().last_error = None;
    }

    fn enter(&self, phase: Phase) {
        let mut state = self.state.write();
        let previous = std::mem::replace(&mut state.phase, phase);
        drop(state);
        match (previous, phase) {
            (Phase::WaitingForFile, Phase::WaitingForFile) => {}
            (_, Phase::WaitingForFile) => {
                log::info!("waiting for game state export at {}", self.path.display())
            }
            (Phase::WaitingForFile, _) => log::info!("watching {}", self.path.display()),
            _ => {}
        }
    }

    /// Tick until `stop` is set.
    pub fn run(&mut self, stop: &AtomicBool) {
        self.run_with(stop, |_, _| {});
    }

    /// Tick until `stop` is set, handing each outcome to `on_tick`.
    /// The flag is checked between ticks, never during a read.
    pub fn run_with<F>(&mut self, stop: &AtomicBool, mut on_tick: F)
    where
        F: FnMut(&TickOutcome, &StateHandle),
    {
        while !stop.load(Ordering::SeqCst) {
            let outcome = self.tick();
            on_tick(&outcome, &self.state);
            let deadline = Instant::now() + self.interval;
            while !stop.load(Ordering::SeqCst) {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    break;
                }
                thread::sleep(left.min(Self::STOP_CHECK));
            }
        }
        log::info!("stopped watching {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn quick_loop(path: PathBuf) -> PollingLoop {
        PollingLoop::new(
            path,
            Duration::from_millis(10),
            ChangeDetector::default(),
            SnapshotReader::new(crate::reader::RetryPolicy::new(2, Duration::ZERO)),
        )
    }

    #[test]
    fn waits_then_updates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut lp = quick_loop(path.clone());
        let handle = lp.handle();

        assert!(matches!(lp.tick(), TickOutcome::WaitingForFile));
        assert_eq!(handle.phase(), Phase::WaitingForFile);
        assert!(handle.latest_state().is_none());
        assert!(handle.analyze_hand().is_none());

        fs::write(&path, r#"{"current_hand":[{"rank":"Ace","suit":"Spades"}]}"#).unwrap();
        assert!(matches!(lp.tick(), TickOutcome::Updated(_)));
        assert_eq!(handle.phase(), Phase::Watching);
        assert_eq!(lp.interval(), Duration::from_millis(10));
        let view = handle.view();
        assert_eq!(view.updates(), 1);
        assert!(view.marker().is_some());
        assert!(view.updated_at().is_some());
        assert_eq!(handle.analyze_hand().map(|c| c.card_count), Some(1));

        assert!(matches!(lp.tick(), TickOutcome::Unchanged));
        assert_eq!(handle.view().updates(), 1);
    }

    #[test]
    fn failed_read_keeps_previous_pair() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"player_data":{"cash":3}}"#).unwrap();
        let mut lp = quick_loop(path.clone());
        let handle = lp.handle();
        assert!(matches!(lp.tick(), TickOutcome::Updated(_)));
        let before = handle.view();

        fs::write(&path, r#"{"player_data":{"cash":"#).unwrap();
        assert!(matches!(lp.tick(), TickOutcome::ReadFailed(_)));
        let after = handle.view();
        assert_eq!(after.marker(), before.marker());
        assert_eq!(after.snapshot(), before.snapshot());
        assert!(after.last_error().is_some());

        fs::write(&path, r#"{"player_data":{"cash":30}}"#).unwrap();
        assert!(matches!(lp.tick(), TickOutcome::Updated(_)));
        assert!(handle.view().last_error().is_none());
    }

    #[test]
    fn stop_flag_ends_run() {
        let dir = tempdir().unwrap();
        let mut lp = quick_loop(dir.path().join("state.json"));
        let stop = AtomicBool::new(false);
        let mut ticks = 0;
        lp.run_with(&stop, |outcome, _| {
            assert!(matches!(outcome, TickOutcome::WaitingForFile));
            ticks += 1;
            if ticks == 3 {
                stop.store(true, Ordering::SeqCst);
            }
        });
        assert_eq!(ticks, 3);
    }
}
