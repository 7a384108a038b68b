// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. sync::SyncError)
    clippy::module_name_repetitions
)]

//! # Syncpad
//!
//! A terminal notepad whose buffer is kept in sync with one file on disk.
//!
//! A background thread wakes on a fixed interval and either writes the
//! buffer out, when it was edited since the last check, or reloads it,
//! when the file changed on disk. Local edits always win a tie.
//!
//! ## Architecture
//!
//! The terminal side uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`sync`]: Dirty tracking, file reconciliation, and the polling thread
//! - [`config`]: The preference file remembering the last edited file
//! - [`editor`]: The rope-backed text buffer
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod editor;
pub mod sync;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, SharedBuffer};
    pub use crate::editor::EditorBuffer;
    pub use crate::sync::{EditorShell, FileMode, SyncHandle, SyncSession, TickOutcome};
}
