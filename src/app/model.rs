use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app::SharedBuffer;
use crate::sync::{FileMode, SyncState};
use crate::ui::{cursor_in_rows, text_width, wrap_line};

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The path being typed for an open or save-as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub mode: FileMode,
    pub input: String,
}

impl Prompt {
    pub const fn label(&self) -> &'static str {
        match self.mode {
            FileMode::Open => "Open file",
            FileMode::Save => "Save as",
        }
    }
}

/// Snapshot of the sync session for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub path: Option<PathBuf>,
    pub state: SyncState,
    pub dirty: bool,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            path: None,
            state: SyncState::Idle,
            dirty: false,
        }
    }
}

/// Complete UI state.
pub struct Model {
    pub buffer: Arc<SharedBuffer>,
    /// Line index of the first visible line.
    pub scroll_offset: usize,
    pub terminal_size: (u16, u16),
    pub prompt: Option<Prompt>,
    pub status: SyncStatus,
    /// Set by a submitted prompt; drained into the sync session.
    pub pending_selection: Option<(PathBuf, FileMode)>,
    /// Reload count last shown to the user.
    pub reloads_seen: u64,
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("scroll_offset", &self.scroll_offset)
            .field("terminal_size", &self.terminal_size)
            .field("prompt", &self.prompt)
            .field("status", &self.status)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(buffer: Arc<SharedBuffer>, terminal_size: (u16, u16)) -> Self {
        let reloads_seen = buffer.reload_count();
        Self {
            buffer,
            scroll_offset: 0,
            terminal_size,
            prompt: None,
            status: SyncStatus::default(),
            pending_selection: None,
            reloads_seen,
            should_quit: false,
            toast: None,
        }
    }

    /// Rows available for text: everything but the status bar and, when
    /// present, the prompt or toast line.
    pub fn editor_height(&self) -> usize {
        let footer = 1 + u16::from(self.prompt.is_some() || self.toast.is_some());
        usize::from(self.terminal_size.1.saturating_sub(footer).max(1))
    }

    /// Scroll so the cursor's row is on screen, counting the rows wrapped
    /// lines take.
    pub fn ensure_cursor_visible(&mut self) {
        let height = self.editor_height();
        let buf = self.buffer.lock();
        let cursor = buf.cursor();
        if cursor.line <= self.scroll_offset {
            self.scroll_offset = cursor.line;
            return;
        }

        let width = text_width(self.terminal_size.0, buf.line_count());
        let line = buf.line_at(cursor.line).unwrap_or_default();
        let (cursor_row, _) = cursor_in_rows(&line, &wrap_line(&line, width), cursor.col);

        // Walk up from the cursor while the rows above still fit.
        let mut used = cursor_row + 1;
        let mut top = cursor.line;
        while top > self.scroll_offset {
            let above = wrap_line(&buf.line_at(top - 1).unwrap_or_default(), width).len();
            if used + above > height {
                break;
            }
            used += above;
            top -= 1;
        }
        self.scroll_offset = top;
    }

    /// Check for a reload by the sync thread since last call.
    pub fn take_reload(&mut self) -> bool {
        let count = self.buffer.reload_count();
        if count == self.reloads_seen {
            return false;
        }
        self.reloads_seen = count;
        true
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Arc::new(SharedBuffer::default()), (80, 24))
    }
}
