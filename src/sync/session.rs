use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::config::{Preferences, save_preferences};
use crate::sync::reconciler::{disk_modified, read_buffer, write_buffer};
use crate::sync::{DirtyFlag, SyncError};

/// The editing surface as seen by the sync core.
///
/// Implementations own the visible buffer; the core only reads it whole
/// before a write and replaces it whole after a reload.
pub trait EditorShell: Send + Sync {
    /// Full text of the buffer.
    fn buffer_text(&self) -> String;
    /// Replace the buffer with text loaded from disk.
    ///
    /// This is not a user edit and must not mark the buffer dirty.
    fn replace_buffer_text(&self, text: String);

    /// Replace the buffer unless `dirty` is set, returning whether it did.
    ///
    /// Shells that mark edits while holding their own buffer lock should
    /// override this to check the flag under that lock, so an edit can never
    /// land between the check and the replacement.
    fn replace_if_clean(&self, text: String, dirty: &DirtyFlag) -> bool {
        if dirty.is_dirty() {
            return false;
        }
        self.replace_buffer_text(text);
        true
    }
}

/// How a newly selected file relates to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Load the file into the buffer.
    Open,
    /// Write the buffer to the file.
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No target file selected.
    Idle,
    /// Synchronizing against a target file.
    Active,
    /// The polling thread has exited.
    Stopped,
}

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// No target file.
    Idle,
    /// Nothing to write and the file is not newer than the cached time.
    Unchanged,
    /// Dirty buffer written; carries the new cached modification time.
    Wrote(SystemTime),
    /// Newer file loaded into the buffer; carries the new cached modification time.
    Reloaded(SystemTime),
    /// The file was newer but an edit landed while it was read; the edit is
    /// written on the next tick instead.
    Deferred,
    /// The read or write failed and will be retried next tick.
    Failed(SyncError),
}

#[derive(Debug, Default)]
struct TargetFile {
    path: Option<PathBuf>,
    synced_at: Option<SystemTime>,
}

/// Shared state between the editor shell and the polling thread.
pub struct SyncSession {
    shell: Arc<dyn EditorShell>,
    dirty: Arc<DirtyFlag>,
    target: Mutex<TargetFile>,
    stopped: AtomicBool,
    preferences_path: Option<PathBuf>,
}

impl SyncSession {
    /// Create an idle session for `shell`.
    pub fn new(shell: Arc<dyn EditorShell>) -> Self {
        Self {
            shell,
            dirty: Arc::new(DirtyFlag::new()),
            target: Mutex::new(TargetFile::default()),
            stopped: AtomicBool::new(false),
            preferences_path: None,
        }
    }

    /// Persist the target file to this preference file whenever it changes.
    #[must_use]
    pub fn with_preferences_path(mut self, path: PathBuf) -> Self {
        self.preferences_path = Some(path);
        self
    }

    /// Track edits through a flag the shell already marks itself.
    ///
    /// A shell that sets the flag at the moment of an edit closes the gap
    /// between changing its buffer and calling [`SyncSession::on_edit`].
    #[must_use]
    pub fn with_dirty_flag(mut self, dirty: Arc<DirtyFlag>) -> Self {
        self.dirty = dirty;
        self
    }

    /// Called by the shell on every content-changing edit.
    pub fn on_edit(&self) {
        self.dirty.mark_dirty();
    }

    /// Whether an edit is waiting to be written.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// The file being synchronized, if one is selected.
    pub fn target_path(&self) -> Option<PathBuf> {
        self.lock_target().path.clone()
    }

    /// Modification time of the last successful read or write.
    pub fn synced_at(&self) -> Option<SystemTime> {
        self.lock_target().synced_at
    }

    /// `Stopped` once the polling thread exited, else `Active` while a
    /// target is selected.
    pub fn state(&self) -> SyncState {
        if self.stopped.load(Ordering::Acquire) {
            SyncState::Stopped
        } else if self.lock_target().path.is_some() {
            SyncState::Active
        } else {
            SyncState::Idle
        }
    }

    /// Switch to `path`, persist it as the preferred file, then load or
    /// write immediately instead of waiting for the next tick.
    ///
    /// # Errors
    /// Returns the read or write failure. The new target stays selected
    /// either way, so the polling loop keeps retrying.
    pub fn select_file(&self, path: impl Into<PathBuf>, mode: FileMode) -> Result<(), SyncError> {
        let path = path.into();
        let mut target = self.retarget(&path);
        info!(path = %path.display(), ?mode, "target file selected");
        self.persist_target(&path);
        match mode {
            FileMode::Open => self.load(&path, &mut target).map(drop),
            FileMode::Save => self.store(&path, &mut target).map(drop),
        }
    }

    /// Reopen the file remembered from a previous run without rewriting
    /// the preference it came from.
    ///
    /// # Errors
    /// Returns the read failure; a missing file leaves the buffer untouched
    /// and the cached modification time unset.
    pub fn restore_target(&self, path: impl Into<PathBuf>) -> Result<(), SyncError> {
        let path = path.into();
        let mut target = self.retarget(&path);
        info!(path = %path.display(), "restoring target file");
        self.load(&path, &mut target).map(drop)
    }

    /// Run one check-and-act cycle.
    ///
    /// A dirty buffer is written before the file is even looked at, so a
    /// local edit is never replaced by a reload in the same tick.
    pub fn tick(&self) -> TickOutcome {
        let mut target = self.lock_target();
        let Some(path) = target.path.clone() else {
            return TickOutcome::Idle;
        };

        if self.dirty.consume_if_dirty() {
            debug!(path = %path.display(), "buffer dirty; writing");
            return match self.store_consumed(&path, &mut target) {
                Ok(modified) => TickOutcome::Wrote(modified),
                Err(err) => TickOutcome::Failed(err),
            };
        }

        let Some(on_disk) = disk_modified(&path) else {
            return TickOutcome::Unchanged;
        };
        if target.synced_at.is_some_and(|seen| on_disk <= seen) {
            return TickOutcome::Unchanged;
        }

        debug!(path = %path.display(), "file changed on disk; reloading");
        match self.reload(&path, &mut target) {
            Ok(Some(modified)) => TickOutcome::Reloaded(modified),
            Ok(None) => TickOutcome::Deferred,
            Err(err) => TickOutcome::Failed(err),
        }
    }

    pub(crate) fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    fn lock_target(&self) -> MutexGuard<'_, TargetFile> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn retarget(&self, path: &Path) -> MutexGuard<'_, TargetFile> {
        let mut target = self.lock_target();
        target.path = Some(path.to_path_buf());
        target.synced_at = None;
        target
    }

    fn persist_target(&self, path: &Path) {
        let Some(prefs_path) = &self.preferences_path else {
            return;
        };
        let prefs = Preferences {
            filename: Some(path.to_path_buf()),
        };
        if let Err(err) = save_preferences(prefs_path, &prefs) {
            warn!(error = %err, "could not persist target file");
        }
    }

    /// Load on explicit selection; pending edits belong to the previous
    /// content and are dropped once the new content is in hand.
    fn load(&self, path: &Path, target: &mut TargetFile) -> Result<SystemTime, SyncError> {
        let (text, modified) = read_buffer(path).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "load failed");
        })?;
        self.dirty.consume_if_dirty();
        self.shell.replace_buffer_text(text);
        target.synced_at = Some(modified);
        info!(path = %path.display(), "loaded file");
        Ok(modified)
    }

    /// Reload from disk unless an edit arrived meanwhile. A skipped reload
    /// leaves the cached time alone; the next tick writes the edit instead.
    fn reload(
        &self,
        path: &Path,
        target: &mut TargetFile,
    ) -> Result<Option<SystemTime>, SyncError> {
        let (text, modified) = read_buffer(path).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "reload failed");
        })?;
        if !self.shell.replace_if_clean(text, &self.dirty) {
            debug!(path = %path.display(), "edit pending; reload skipped");
            return Ok(None);
        }
        target.synced_at = Some(modified);
        info!(path = %path.display(), "reloaded file changed on disk");
        Ok(Some(modified))
    }

    fn store(&self, path: &Path, target: &mut TargetFile) -> Result<SystemTime, SyncError> {
        self.dirty.consume_if_dirty();
        self.store_consumed(path, target)
    }

    /// Write the buffer after the dirty flag has been taken. On failure the
    /// flag is put back so the next tick retries.
    fn store_consumed(&self, path: &Path, target: &mut TargetFile) -> Result<SystemTime, SyncError> {
        let text = self.shell.buffer_text();
        match write_buffer(path, &text) {
            Ok(modified) => {
                target.synced_at = Some(modified);
                info!(path = %path.display(), bytes = text.len(), "wrote buffer");
                Ok(modified)
            }
            Err(err) => {
                self.dirty.mark_dirty();
                warn!(path = %path.display(), error = %err, "write failed; will retry");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = self.lock_target();
        f.debug_struct("SyncSession")
            .field("path", &target.path)
            .field("synced_at", &target.synced_at)
            .field("dirty", &self.dirty.is_dirty())
            .field("stopped", &self.stopped.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
