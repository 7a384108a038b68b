use std::path::Path;

use tracing::warn;

use crate::app::model::SyncStatus;
use crate::app::{App, Model, ToastLevel};
use crate::sync::{FileMode, SyncSession};

impl App {
    /// Forward a file selection queued by `update` to the sync session and
    /// pick up what the sync thread did. Returns whether anything on screen
    /// changed.
    pub(super) fn apply_side_effects(model: &mut Model, session: &SyncSession) -> bool {
        let mut changed = false;

        if let Some((path, mode)) = model.pending_selection.take() {
            let path = std::path::absolute(&path).unwrap_or(path);
            match session.select_file(&path, mode) {
                Ok(()) => {
                    let verb = match mode {
                        FileMode::Open => "Opened",
                        FileMode::Save => "Saved to",
                    };
                    model.show_toast(ToastLevel::Info, format!("{verb} {}", path.display()));
                }
                Err(err) if mode == FileMode::Open && err.is_not_found() => {
                    model.show_toast(
                        ToastLevel::Warning,
                        format!("{} does not exist yet; typing will create it", file_label(&path)),
                    );
                }
                Err(err) => {
                    warn!(error = %err, "file selection failed");
                    model.show_toast(ToastLevel::Error, err.to_string());
                }
            }
            // The loaded text may put the cursor anywhere.
            model.take_reload();
            model.ensure_cursor_visible();
            changed = true;
        }

        if model.take_reload() {
            model.ensure_cursor_visible();
            model.show_toast(ToastLevel::Info, "Reloaded: file changed on disk");
            changed = true;
        }

        let status = SyncStatus {
            path: session.target_path(),
            state: session.state(),
            dirty: session.is_dirty(),
        };
        if status != model.status {
            model.status = status;
            changed = true;
        }
        changed
    }
}

pub(super) fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}
