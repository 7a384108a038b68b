//! The terminal editing surface and its event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete UI state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! The text itself lives in a [`SharedBuffer`] so the sync thread can write
//! it out or replace it while the UI keeps editing.

mod effects;
mod event_loop;
mod input;
mod model;
mod shared;
mod update;

pub use event_loop::Startup;
pub use model::{Model, Prompt, SyncStatus, ToastLevel};
pub use shared::SharedBuffer;
pub use update::{Message, update};

use std::path::PathBuf;
use std::time::Duration;

use crate::sync::DEFAULT_POLL_INTERVAL;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    initial_file: Option<PathBuf>,
    poll_interval: Duration,
    preferences_path: Option<PathBuf>,
}

impl App {
    pub const fn new() -> Self {
        Self {
            initial_file: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            preferences_path: None,
        }
    }

    /// Open this file instead of the remembered one.
    pub fn with_initial_file(mut self, path: Option<PathBuf>) -> Self {
        self.initial_file = path;
        self
    }

    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Where the last edited file is remembered between runs.
    pub fn with_preferences_path(mut self, path: Option<PathBuf>) -> Self {
        self.preferences_path = path;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
