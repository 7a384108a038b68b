//! Whole-file reads and writes against the target file.
//!
//! Every successful operation returns the file's modification time as the
//! filesystem reports it right after the I/O, which is what the session
//! caches to recognise its own writes.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::sync::SyncError;

/// Overwrite `path` with `content` and return its new modification time.
///
/// # Errors
/// [`SyncError::NotFound`] if the file or its parent directory does not exist,
/// [`SyncError::WriteFailure`] for any other I/O failure.
pub fn write_buffer(path: &Path, content: &str) -> Result<SystemTime, SyncError> {
    fs::write(path, content).map_err(|e| SyncError::write(path, e))?;
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| SyncError::write(path, e))
}

/// Read `path` with normalized line endings, returning the content and the
/// modification time it was read at.
///
/// The modification time is taken before the content so that a write landing
/// mid-read shows up as newer on the next tick instead of being masked.
///
/// # Errors
/// [`SyncError::NotFound`] if the file does not exist,
/// [`SyncError::ReadFailure`] for any other I/O failure.
pub fn read_buffer(path: &Path) -> Result<(String, SystemTime), SyncError> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| SyncError::read(path, e))?;
    let raw = fs::read(path).map_err(|e| SyncError::read(path, e))?;
    let text = String::from_utf8_lossy(&raw);
    Ok((normalize_line_endings(&text), modified))
}

/// The file's current modification time, or `None` if it cannot be stat'ed.
pub fn disk_modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Terminate every line with exactly one `\n`.
///
/// `\r\n` and lone `\r` count as line terminators; a trailing line without a
/// terminator gets one. Empty input stays empty.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
