//! Engine configuration.
//!
//! Compile-time constants live at the top of this module. Runtime settings
//! are read from an optional TOML file into [`EngineConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::ConfigError;

// =============================================================================
// Command Tree
// =============================================================================

/// Name of the help node generated under every command.
pub const HELP_COMMAND: &str = "help";

/// Description attached to generated help nodes.
pub const HELP_DESCRIPTION: &str = "Show this message.";

/// Placeholder shown for commands, arguments and options without help text.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Separator replacing `-` in prepared parameter keys.
pub const FIELD_SEPARATOR: char = '_';

// =============================================================================
// Schema Defaults
// =============================================================================

/// Literals that coerce to `false` when a boolean spec declares no constraint.
pub const BOOLEAN_FALSE_LITERALS: &[&str] = &["0", "false"];

/// Literals that coerce to `true` when a boolean spec declares no constraint.
pub const BOOLEAN_TRUE_LITERALS: &[&str] = &["1", "true"];

// =============================================================================
// History
// =============================================================================

/// Maximum number of submitted lines kept in the history ledger.
pub const MAX_COMMAND_HISTORY: usize = 1000;

// =============================================================================
// Persistence
// =============================================================================

/// File name used by the default store when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "clidata.yaml";

/// Theme reported before the user picks one.
pub const DEFAULT_THEME: &str = "System";

/// Log filter used when neither the config file nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Settings loaded from a TOML file.
///
/// ```toml
/// history_capacity = 500
/// helper = false
/// store_path = "/tmp/termform.yaml"
/// log_filter = "termform=debug"
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub history_capacity: usize,
    pub helper: bool,
    pub store_path: PathBuf,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_COMMAND_HISTORY,
            helper: true,
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
