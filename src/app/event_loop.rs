use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{info, warn};

use crate::app::effects::file_label;
use crate::app::{App, Model, SharedBuffer, ToastLevel, update};
use crate::config::{Preferences, load_preferences};
use crate::sync::{EditorShell, FileMode, SyncHandle, SyncSession, TickOutcome};

/// How long to wait for input before checking for reloads and toasts.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// A started session plus what to tell the user about how it started.
pub struct Startup {
    pub buffer: Arc<SharedBuffer>,
    pub session: Arc<SyncSession>,
    pub notice: Option<(ToastLevel, String)>,
}

impl App {
    /// Build the session and load the initial file: the one given on the
    /// command line, else the one remembered in the preference file.
    pub fn start_session(&self) -> Startup {
        let buffer = Arc::new(SharedBuffer::default());
        let mut session = SyncSession::new(Arc::clone(&buffer) as Arc<dyn EditorShell>)
            .with_dirty_flag(buffer.dirty_flag());
        if let Some(path) = &self.preferences_path {
            session = session.with_preferences_path(path.clone());
        }
        let session = Arc::new(session);

        let notice = if let Some(path) = &self.initial_file {
            match session.select_file(path, FileMode::Open) {
                Ok(()) => None,
                Err(err) if err.is_not_found() => Some((
                    ToastLevel::Info,
                    format!("New file: {}", file_label(path)),
                )),
                Err(err) => Some((ToastLevel::Error, err.to_string())),
            }
        } else if let Some(path) = self.remembered_file() {
            info!(path = %path.display(), "stored filename");
            match session.restore_target(&path) {
                Ok(()) => None,
                Err(err) => Some((ToastLevel::Warning, err.to_string())),
            }
        } else {
            Some((ToastLevel::Info, "No file yet: Ctrl+O to open, Ctrl+S to save as".into()))
        };

        Startup {
            buffer,
            session,
            notice,
        }
    }

    fn remembered_file(&self) -> Option<std::path::PathBuf> {
        let path = self.preferences_path.as_ref()?;
        match load_preferences(path) {
            Ok(Preferences { filename }) => filename,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable preferences");
                None
            }
        }
    }

    /// Run the editor until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized, the sync
    /// thread cannot be started, or terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let Startup {
            buffer,
            session,
            notice,
        } = self.start_session();

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; syncpad requires an interactive terminal")?;
        let size = terminal.size()?;
        let _ = execute!(stdout(), EnableBracketedPaste, EnableMouseCapture);

        let mut model = Model::new(buffer, (size.width, size.height));
        if let Some((level, message)) = notice {
            model.show_toast(level, message);
        }

        let result = SyncHandle::spawn(Arc::clone(&session), self.poll_interval)
            .context("Failed to start sync thread")
            .and_then(|handle| {
                let result = Self::event_loop(&mut terminal, &mut model, &session);
                handle.stop();
                result
            });

        // Edits made since the last tick.
        if session.is_dirty()
            && let TickOutcome::Failed(err) = session.tick()
        {
            warn!(error = %err, "final write failed");
        }

        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
        ratatui::restore();

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        session: &SyncSession,
    ) -> Result<()> {
        let mut needs_render = true;

        loop {
            if Self::apply_side_effects(model, session) {
                needs_render = true;
            }
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            if event::poll(INPUT_POLL)? {
                // Drain everything queued so key repeat renders once.
                loop {
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        *model = update(std::mem::take(model), msg);
                        needs_render = true;
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
