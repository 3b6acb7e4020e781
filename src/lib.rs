//! balatro-watch: follow an exported Balatro game state and classify the hand
//!
//! Goals:
//! - Never surface a half-written export; retry transient read failures
//! - Keep the last good state available while the file is missing or broken
//! - Pure, deterministic hand classification over the exported cards
//!
//! ## Quick start: classify a hand
//! ```
//! use balatro_watch::cards::{parse_cards, Rank};
//! use balatro_watch::classifier::classify;
//!
//! let hand = parse_cards("2S 2H 2D 5C 5S").unwrap();
//! let result = classify(&hand);
//! assert_eq!(result.full_house(), Some((Rank::Two, Rank::Five)));
//! ```
//!
//! ## Watching the export
//! ```no_run
//! use balatro_watch::config::WatchConfig;
//! use balatro_watch::watcher::PollingLoop;
//! use std::sync::atomic::AtomicBool;
//!
//! let config = WatchConfig::from_env().unwrap();
//! let mut polling = PollingLoop::from_config(&config);
//! let handle = polling.handle();
//! std::thread::spawn(move || polling.run(&AtomicBool::new(false)));
//! if let Some(analysis) = handle.analyze_hand() {
//!     println!("{:?}", analysis.findings());
//! }
//! ```
//!
//! ## TUI
//! Run the dashboard with:
//! ```sh
//! cargo run --bin balatro-watch -- tui
//! ```

pub mod cards;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod reader;
pub mod render;
pub mod snapshot;
pub mod tui;
pub mod watcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
