//! Text buffer behind the terminal editing surface.
//!
//! A rope-backed buffer with cursor management. It knows nothing about
//! files; the sync session decides when its text is written or replaced.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
