//! File/buffer synchronization core.
//!
//! Keeps one target file and an editor buffer converging by polling:
//! each tick either writes a dirty buffer to disk or reloads the buffer
//! when the file's modification time moves past the last one we saw.
//!
//! - [`DirtyFlag`]: atomic "buffer changed" signal
//! - [`reconciler`]: whole-file read/write returning modification times
//! - [`SyncSession`]: target file state, tick logic, file selection
//! - [`SyncHandle`]: the background polling thread

mod dirty;
mod error;
pub mod reconciler;
mod session;
mod worker;

pub use dirty::DirtyFlag;
pub use error::SyncError;
pub use session::{EditorShell, FileMode, SyncSession, SyncState, TickOutcome};
pub use worker::{DEFAULT_POLL_INTERVAL, SyncHandle};
