use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::editor::EditorBuffer;
use crate::sync::{DirtyFlag, EditorShell};

/// The editor buffer shared between the UI thread and the sync thread.
///
/// The UI locks it to edit and draw; the sync thread only goes through
/// [`EditorShell`]. Edits mark the dirty flag before the lock is released,
/// and reloads check it under the same lock, so a reload can never replace
/// a keystroke that has not been written yet. Reloads are counted so the UI
/// can tell when the text changed underneath it.
#[derive(Debug, Default)]
pub struct SharedBuffer {
    inner: Mutex<EditorBuffer>,
    dirty: Arc<DirtyFlag>,
    reloads: AtomicU64,
}

impl SharedBuffer {
    /// Share `buffer` with a fresh, clean dirty flag.
    pub fn new(buffer: EditorBuffer) -> Self {
        Self {
            inner: Mutex::new(buffer),
            dirty: Arc::new(DirtyFlag::new()),
            reloads: AtomicU64::new(0),
        }
    }

    /// Lock for reading or cursor movement. Text changes go through
    /// [`SharedBuffer::edit`] so they are tracked.
    pub fn lock(&self) -> MutexGuard<'_, EditorBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply an edit and mark the buffer dirty if it changed the text.
    pub fn edit(&self, op: impl FnOnce(&mut EditorBuffer) -> bool) -> bool {
        let mut buffer = self.lock();
        let changed = op(&mut buffer);
        if changed {
            self.dirty.mark_dirty();
        }
        changed
    }

    /// The flag edits mark; hand it to the sync session.
    pub fn dirty_flag(&self) -> Arc<DirtyFlag> {
        Arc::clone(&self.dirty)
    }

    /// Number of times the sync core has replaced the text.
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Acquire)
    }
}

impl EditorShell for SharedBuffer {
    fn buffer_text(&self) -> String {
        self.lock().text()
    }

    fn replace_buffer_text(&self, text: String) {
        self.lock().replace_text(&text);
        self.reloads.fetch_add(1, Ordering::AcqRel);
    }

    fn replace_if_clean(&self, text: String, dirty: &DirtyFlag) -> bool {
        let mut buffer = self.lock();
        if dirty.is_dirty() {
            return false;
        }
        buffer.replace_text(&text);
        self.reloads.fetch_add(1, Ordering::AcqRel);
        true
    }
}
