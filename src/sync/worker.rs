use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};

use crate::sync::{SyncSession, TickOutcome};

/// Poll cadence when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Owns the background polling thread for one session.
///
/// Dropping the handle stops the thread too, but [`SyncHandle::stop`] is the
/// way to wait for it.
#[derive(Debug)]
pub struct SyncHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Start ticking `session` every `interval` on a dedicated thread.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(session: Arc<SyncSession>, interval: Duration) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread = std::thread::Builder::new()
            .name("syncpad-poll".to_string())
            .spawn(move || {
                info!(interval_ms = interval.as_millis(), "sync loop started");
                loop {
                    match session.tick() {
                        TickOutcome::Idle | TickOutcome::Unchanged => {}
                        outcome => debug!(?outcome, "tick"),
                    }
                    // The wait doubles as the stop check: a message or a
                    // dropped sender ends the loop, a timeout is the next tick.
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                session.mark_stopped();
                info!("sync loop stopped");
            })?;
        Ok(Self {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }

    /// Signal the loop and wait for the current tick to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Whether the polling thread is still alive.
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{EditorShell, FileMode, SyncState};
    use std::sync::Mutex;
    use std::time::Instant;
    use tempfile::tempdir;

    struct TextShell(Mutex<String>);

    impl EditorShell for TextShell {
        fn buffer_text(&self) -> String {
            self.0.lock().unwrap().clone()
        }

        fn replace_buffer_text(&self, text: String) {
            *self.0.lock().unwrap() = text;
        }
    }

    #[test]
    fn test_stop_joins_and_marks_stopped() {
        let shell = Arc::new(TextShell(Mutex::new(String::new())));
        let session = Arc::new(SyncSession::new(shell));
        let handle = SyncHandle::spawn(Arc::clone(&session), Duration::from_secs(60))
            .expect("spawn");
        assert!(handle.is_running());

        // Stop must not wait out the 60s interval.
        let started = Instant::now();
        handle.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(session.state(), SyncState::Stopped);
    }

    #[test]
    fn test_background_loop_writes_edits() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("note.txt");
        let shell = Arc::new(TextShell(Mutex::new(String::new())));
        let session = Arc::new(SyncSession::new(Arc::clone(&shell) as Arc<dyn EditorShell>));
        session.select_file(&path, FileMode::Save).expect("save");
        let handle =
            SyncHandle::spawn(Arc::clone(&session), Duration::from_millis(10)).expect("spawn");

        *shell.0.lock().unwrap() = "from the loop\n".to_string();
        session.on_edit();

        let deadline = Instant::now() + Duration::from_secs(5);
        while session.is_dirty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        handle.stop();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "from the loop\n");
    }
}
