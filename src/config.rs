use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

const PREFERENCE_FILE_NAME: &str = ".syncpad.rc";
const FILENAME_KEY: &str = "filename: ";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings remembered between runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// The file that was being edited last.
    pub filename: Option<PathBuf>,
}

pub fn preference_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(profile) = std::env::var_os("USERPROFILE") {
            return PathBuf::from(profile).join(PREFERENCE_FILE_NAME);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(PREFERENCE_FILE_NAME);
    }

    PathBuf::from(PREFERENCE_FILE_NAME)
}

/// Load preferences from `path`. A missing file means nothing was saved yet.
///
/// # Errors
/// Returns [`PreferenceError::Read`] if the file exists but cannot be read.
pub fn load_preferences(path: &Path) -> Result<Preferences, PreferenceError> {
    if !path.exists() {
        return Ok(Preferences::default());
    }
    let content = fs::read_to_string(path).map_err(|source| PreferenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_preferences(&content))
}

/// Overwrite `path` with `prefs`.
///
/// # Errors
/// Returns [`PreferenceError::Write`] if the file cannot be written.
pub fn save_preferences(path: &Path, prefs: &Preferences) -> Result<(), PreferenceError> {
    let line = prefs
        .filename
        .as_ref()
        .map_or_else(String::new, |f| format!("{FILENAME_KEY}{}\n", f.display()));
    fs::write(path, line).map_err(|source| PreferenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick out the recognised `filename: <path>` line; everything else is ignored.
/// The last such line wins.
pub fn parse_preferences(content: &str) -> Preferences {
    let mut prefs = Preferences::default();
    for line in content.lines() {
        if let Some(value) = line.strip_prefix(FILENAME_KEY) {
            let value = value.trim();
            prefs.filename = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
    }
    prefs
}
