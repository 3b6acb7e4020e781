use crate::tui::app::{AppState, InputAction};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

/// Draw and handle keys until the user quits. The watcher state is
/// re-read once per `tick_rate`.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.refresh();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an action. Returns true when the app should exit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputAction::Quit),
        KeyCode::Char('?') => Some(InputAction::ToggleHelp),
        KeyCode::Char('j') | KeyCode::Char('J') => Some(InputAction::ToggleRaw),
        KeyCode::Esc => Some(InputAction::CloseOverlay),
        KeyCode::Up if app.raw_open() => Some(InputAction::RawUp),
        KeyCode::Down if app.raw_open() => Some(InputAction::RawDown),
        _ => None,
    };
    if let Some(action) = action {
        let _ = app.handle_input(action);
    }
    app.should_quit()
}
