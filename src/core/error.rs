//! Error types for the engine.
//!
//! - [`ValidationError`] - user input rejected by the resolver or validator
//! - [`SchemaError`] - malformed command registration (programmer error)
//! - [`StoreError`] - persistence collaborator failures
//! - [`ConfigError`] - configuration file failures

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{AllowedValues, ValueType};

// =============================================================================
// Validation Errors
// =============================================================================

/// A supplied value that failed coercion or constraint checks.
#[derive(Clone, Debug, PartialEq)]
pub struct InvalidField {
    /// Spec name (options are rendered with a `--` prefix).
    pub name: String,
    /// Raw value as typed, `None` when the field was left bare.
    pub value: Option<String>,
    pub expected: ValueType,
    /// Literal groups or ranges the value had to fall in.
    pub allowed: Option<AllowedValues>,
}

/// An option supplied without the options it depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct MissingPrerequisite {
    /// Option key exactly as the user typed it.
    pub option: String,
    /// Prerequisite groups with no member present.
    pub unmet: Vec<Vec<String>>,
}

/// Rejection of a submitted line.
///
/// Only one kind is reported per submission, chosen by priority:
/// unknown command, then argument errors, then option errors, then
/// confirmation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("Commands not found: {}", .words.join(", "))]
    UnknownCommand { words: Vec<String> },

    #[error("Missing arguments: {}", .names.join(", "))]
    MissingArgument { names: Vec<String> },

    #[error("Overflow arguments: {}", .values.join(", "))]
    OverflowArgument { values: Vec<String> },

    #[error("Arguments with invalid value: {}", render_invalid(.fields, ""))]
    InvalidArgumentValue { fields: Vec<InvalidField> },

    #[error("Missing required options: {}", .names.join(", "))]
    MissingRequiredOption { names: Vec<String> },

    #[error("Options with invalid value: {}", render_invalid(.fields, "--"))]
    InvalidOptionValue { fields: Vec<InvalidField> },

    #[error("Non existing options: {}", render_prefixed(.names))]
    NonExistingOption { names: Vec<String> },

    #[error("Missing option prerequisites: {}", render_prerequisites(.entries))]
    MissingOptionPrerequisite { entries: Vec<MissingPrerequisite> },

    #[error("'{command}' requires confirmation before it runs")]
    ConfirmationRequired { command: String },
}

fn render_invalid(fields: &[InvalidField], prefix: &str) -> String {
    fields
        .iter()
        .map(|field| {
            let value = field.value.as_deref().unwrap_or("");
            match &field.allowed {
                Some(allowed) => format!(
                    "{}{}={} ({}, allowed: {})",
                    prefix, field.name, value, field.expected, allowed
                ),
                None => format!("{}{}={} ({})", prefix, field.name, value, field.expected),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_prefixed(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("--{}", name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render prerequisite groups as `(--a, --b), (--c)`.
pub(crate) fn render_groups(groups: &[Vec<String>]) -> String {
    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "({})", render_prefixed(group));
    }
    out
}

fn render_prerequisites(entries: &[MissingPrerequisite]) -> String {
    entries
        .iter()
        .map(|entry| format!("--{} ({})", entry.option, render_groups(&entry.unmet)))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Malformed command or spec registration.
///
/// These are raised while composing the command tree, before any line is
/// processed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SchemaError {
    #[error("command and spec names must not be empty")]
    EmptyName,

    #[error("parent command not found: '{}'", .path.join(" "))]
    UnknownParent { path: Vec<String> },

    #[error("'{name}' is already registered under '{parent}'")]
    DuplicateName { parent: String, name: String },

    #[error("'{spec}': literal constraints are not allowed on {value_type} values")]
    LiteralsOnNumeric { spec: String, value_type: ValueType },

    #[error("'{spec}': range constraints are only allowed on int and float values")]
    RangesOnText { spec: String },

    #[error("'{spec}': range [{min}, {max}] is inverted")]
    InvertedRange { spec: String, min: f64, max: f64 },

    #[error("'{spec}': boolean constraints need exactly two literal groups, got {groups}")]
    BooleanGroups { spec: String, groups: usize },

    #[error("'{spec}': default value must be of type {expected}")]
    DefaultType { spec: String, expected: ValueType },

    #[error("'{spec}': prerequisite groups must not be empty")]
    EmptyPrerequisiteGroup { spec: String },
}

// =============================================================================
// Store Errors
// =============================================================================

/// Failures of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed session data: {0}")]
    Format(#[from] serde_yaml::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Failures while loading [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
