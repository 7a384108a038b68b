//! Terminal UI components.
//!
//! - [`render`]: the text area with its line-number gutter
//! - [`wrap`]: soft wrapping shared by rendering and scrolling
//! - [`status`]: status, prompt, and toast bars

mod render;
mod status;
pub mod wrap;

pub use render::{line_number_width, view};
pub use wrap::{cursor_in_rows, display_width, text_width, wrap_line};

/// Columns a tab occupies on screen.
pub const TAB_WIDTH: usize = 4;
