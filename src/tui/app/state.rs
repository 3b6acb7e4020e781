use crate::classifier::{classify, Classification};
use crate::watcher::{Phase, StateHandle, WatchState};
use std::path::{Path, PathBuf};

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    ToggleHelp,
    ToggleRaw,
    RawUp,
    RawDown,
    CloseOverlay,
    Quit,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    handle: StateHandle,
    snapshot_path: PathBuf,
    // Copy of the watcher state taken on the last refresh
    view: WatchState,
    analysis: Option<Classification>,
    raw_lines: Vec<String>,
    help_open: bool,
    raw_open: bool,
    raw_offset: usize,
    quit: bool,
}

impl AppState {
    pub const RAW_PAGE_SIZE: usize = 20;

    pub fn new(handle: StateHandle, snapshot_path: impl Into<PathBuf>) -> Self {
        let mut app = Self {
            handle,
            snapshot_path: snapshot_path.into(),
            view: WatchState::default(),
            analysis: None,
            raw_lines: Vec::new(),
            help_open: false,
            raw_open: false,
            raw_offset: 0,
            quit: false,
        };
        app.refresh();
        app
    }

    /// Pull the latest watcher state. Analysis is recomputed only when the
    /// snapshot actually changed.
    pub fn refresh(&mut self) {
        let view = self.handle.view();
        if view.updates() != self.view.updates() || self.view.snapshot().is_none() {
            self.analysis = view
                .snapshot()
                .filter(|s| s.has_cards())
                .map(|s| classify(&s.current_hand));
            self.raw_lines = view
                .snapshot()
                .and_then(|s| serde_json::to_string_pretty(&s.raw).ok())
                .map(|text| text.lines().map(str::to_string).collect())
                .unwrap_or_default();
            self.raw_offset = self.raw_offset.min(self.max_raw_offset());
        }
        self.view = view;
    }

    pub fn view(&self) -> &WatchState {
        &self.view
    }

    pub fn analysis(&self) -> Option<&Classification> {
        self.analysis.as_ref()
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn waiting(&self) -> bool {
        self.view.phase() == Phase::WaitingForFile
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn raw_open(&self) -> bool {
        self.raw_open
    }

    pub fn raw_offset(&self) -> usize {
        self.raw_offset
    }

    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn max_raw_offset(&self) -> usize {
        self.raw_lines.len().saturating_sub(Self::RAW_PAGE_SIZE)
    }

    /// Apply an action. Returns true if anything visible changed.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleHelp => {
                self.help_open = !self.help_open;
                if self.help_open {
                    self.raw_open = false;
                }
                true
            }
            InputAction::ToggleRaw => {
                if !self.raw_open && self.view.snapshot().is_none() {
                    return false;
                }
                self.raw_open = !self.raw_open;
                if self.raw_open {
                    self.help_open = false;
                }
                true
            }
            InputAction::RawUp => {
                if self.raw_open && self.raw_offset > 0 {
                    self.raw_offset -= 1;
                    return true;
                }
                false
            }
            InputAction::RawDown => {
                if self.raw_open && self.raw_offset < self.max_raw_offset() {
                    self.raw_offset += 1;
                    return true;
                }
                false
            }
            InputAction::CloseOverlay => {
                let was_open = self.help_open || self.raw_open;
                self.help_open = false;
                self.raw_open = false;
                was_open
            }
            InputAction::Quit => {
                self.quit = true;
                true
            }
        }
    }
}
