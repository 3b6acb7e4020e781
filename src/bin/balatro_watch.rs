use anyhow::{bail, Context, Error};
use balatro_watch::config::{default_snapshot_path, WatchConfig};
use balatro_watch::detector::MarkerKind;
use balatro_watch::reader::{RetryPolicy, SnapshotReader};
use balatro_watch::render::{hand_summary, AnalysisReport, StateReport, NO_CARDS, NO_STATE};
use balatro_watch::tui::{app::AppState, controller};
use balatro_watch::watcher::{PollingLoop, TickOutcome};
use balatro_watch::{classifier::classify, snapshot::GameSnapshot};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::info;
use pico_args::Arguments;
use ratatui::prelude::*;
use std::convert::Infallible;
use std::ffi::OsStr;
use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const HELP: &str = "\
Follow the exported Balatro game state and analyse the current hand

USAGE:
  balatro-watch [COMMAND] [OPTIONS]

COMMANDS:
  watch        Print every new game state as it is exported  [default]
  tui          Interactive dashboard
  state        Read the current game state once and print it
  analyze      Read the current game state once and list possible poker hands

OPTIONS:
  --path FILE            Game state file  [default: <data dir>/Balatro/mcp-bridge/mcp_gamestate.json]
  --interval-ms N        Polling interval in milliseconds  [default: 500]
  --retries N            Read attempts before giving up  [default: 5]
  --retry-delay-ms N     Delay between read attempts  [default: 100]
  --marker KIND          Change detection: modified | content  [default: modified]
  --json                 Include the raw JSON document (watch, state)

FLAGS:
  -h, --help             Print help information
  -V, --version          Print version

ENVIRONMENT:
  RUST_LOG               Log filter (e.g. debug). In tui mode logs are only written when set.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Watch,
    Tui,
    State,
    Analyze,
}

struct Args {
    command: Command,
    config: WatchConfig,
    json: bool,
}

fn os_path(s: &OsStr) -> Result<PathBuf, Infallible> {
    Ok(PathBuf::from(s))
}

fn parse_args(mut pargs: Arguments) -> Result<Args, Error> {
    let command = match pargs.subcommand()?.as_deref() {
        None | Some("watch") => Command::Watch,
        Some("tui") => Command::Tui,
        Some("state") => Command::State,
        Some("analyze") | Some("analyse") => Command::Analyze,
        Some(other) => bail!("unknown command '{other}'; see --help"),
    };

    let path = match pargs.opt_value_from_os_str("--path", os_path)? {
        Some(path) => path,
        None => default_snapshot_path().context("no --path given")?,
    };
    let mut config = WatchConfig::for_path(path);
    if let Some(ms) = pargs.opt_value_from_str::<_, u64>("--interval-ms")? {
        config.poll_interval = Duration::from_millis(ms);
    }
    let retries = pargs.opt_value_from_str::<_, u32>("--retries")?;
    let delay = pargs.opt_value_from_str::<_, u64>("--retry-delay-ms")?;
    config.retry = RetryPolicy::new(
        retries.unwrap_or(RetryPolicy::DEFAULT_ATTEMPTS),
        delay.map_or(RetryPolicy::DEFAULT_DELAY, Duration::from_millis),
    );
    if let Some(marker) = pargs.opt_value_from_str::<_, MarkerKind>("--marker")? {
        config.marker = marker;
    }
    let json = pargs.contains("--json");

    let rest = pargs.finish();
    if !rest.is_empty() {
        bail!("unexpected arguments: {rest:?}");
    }
    config.validate()?;
    Ok(Args { command, config, json })
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }
    if pargs.contains(["-V", "--version"]) {
        println!("balatro-watch {}", balatro_watch::VERSION);
        std::process::exit(0);
    }

    let args = parse_args(pargs)?;

    // The dashboard owns the terminal, so only log there when asked to.
    if args.command != Command::Tui || std::env::var_os("RUST_LOG").is_some() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_target(false)
            .init();
    }

    match args.command {
        Command::Watch => watch(&args),
        Command::Tui => tui(&args),
        Command::State => one_shot(&args, |snapshot| {
            print!("{}", StateReport::new(snapshot).with_raw(args.json));
        }),
        Command::Analyze => one_shot(&args, |snapshot| {
            if snapshot.has_cards() {
                print!("{}", AnalysisReport(&classify(&snapshot.current_hand)));
            } else {
                println!("{NO_CARDS}");
            }
        }),
    }
}

fn one_shot<F: FnOnce(&GameSnapshot)>(args: &Args, show: F) -> Result<(), Error> {
    let path = &args.config.snapshot_path;
    if !path.exists() {
        println!("{NO_STATE}");
        return Ok(());
    }
    let snapshot = SnapshotReader::new(args.config.retry).read(path)?;
    show(&snapshot);
    Ok(())
}

fn watch(args: &Args) -> Result<(), Error> {
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        // Catching signals for exit.
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))?;
    }

    let mut polling = PollingLoop::from_config(&args.config);
    info!("game state file: {}", polling.path().display());
    let json = args.json;
    polling.run_with(&stop, |outcome, _| {
        if let TickOutcome::Updated(snapshot) = outcome {
            let rule = "=".repeat(60);
            println!("\n{rule}");
            println!("Updated at: {}", chrono::Local::now().format("%H:%M:%S"));
            println!("{rule}");
            print!("{}", StateReport::new(snapshot).with_raw(json));
            if snapshot.has_cards() {
                println!(
                    "Hand ({}): {}",
                    snapshot.current_hand.len(),
                    hand_summary(&snapshot.current_hand)
                );
            }
            println!();
        }
    });
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn tui(args: &Args) -> Result<(), Error> {
    if !io::stdout().is_terminal() {
        bail!("the dashboard requires a real terminal (TTY); use `watch` instead");
    }

    let stop = Arc::new(AtomicBool::new(false));
    let mut polling = PollingLoop::from_config(&args.config);
    let mut app = AppState::new(polling.handle(), polling.path());
    let worker = {
        let stop = Arc::clone(&stop);
        thread::Builder::new()
            .name("balatro-watch-poll".into())
            .spawn(move || polling.run(&stop))
            .context("failed to start the polling thread")?
    };

    let mut terminal = setup_terminal()?;
    let res = controller::run(&mut terminal, &mut app, Duration::from_millis(250));

    // Stop the poller and always attempt to restore terminal
    stop.store(true, Ordering::SeqCst);
    let restored = restore_terminal(terminal);
    if worker.join().is_err() {
        bail!("polling thread panicked");
    }
    restored.context("failed to restore the terminal")?;
    res?;
    Ok(())
}
