//! Session persistence.
//!
//! The engine only needs a [`Store`]: something that loads and saves a
//! [`SessionState`]. [`YamlStore`] keeps it in a flat YAML document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_THEME;
use crate::core::error::StoreError;

/// User-facing switches that survive restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Open a correction form when a line fails validation.
    pub helper: bool,
    pub current_theme: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            helper: true,
            current_theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// Everything persisted between sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Newest first.
    pub commands_history: Vec<String>,
    pub current_working_directory: PathBuf,
    #[serde(flatten)]
    pub preferences: Preferences,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            commands_history: Vec::new(),
            current_working_directory: PathBuf::from("."),
            preferences: Preferences::default(),
        }
    }
}

/// Persistence collaborator.
pub trait Store {
    fn load(&self) -> Result<SessionState, StoreError>;
    fn save(&self, state: &SessionState) -> Result<(), StoreError>;
}

/// [`Store`] backed by a YAML file.
///
/// A missing file loads as the default state.
#[derive(Clone, Debug)]
pub struct YamlStore {
    path: PathBuf,
}

impl YamlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Store for YamlStore {
    fn load(&self) -> Result<SessionState, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved session");
                return Ok(SessionState::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };
        if text.trim().is_empty() {
            return Ok(SessionState::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let text = serde_yaml::to_string(state)?;
        std::fs::write(&self.path, text).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), entries = state.commands_history.len(), "session saved");
        Ok(())
    }
}
