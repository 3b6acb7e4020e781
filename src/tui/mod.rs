//! Terminal dashboard over a running [`PollingLoop`](crate::watcher::PollingLoop).

pub mod app;
pub mod controller;
pub mod ui;
