//! Core engine: from a typed line to a dispatched command.
//!
//! This module provides:
//! - [`parser`] splitting a line into commands, arguments and options
//! - [`commands`] declaring commands and holding them in a [`CommandTree`]
//! - [`resolver`] and [`validator`] turning a parsed line into prepared parameters
//! - [`autocomplete`] for tab completion
//! - [`Session`] tying these together with history, confirmation and the
//!   correction form

pub mod autocomplete;
pub mod builtins;
pub mod commands;
pub mod error;
pub mod filesystem;
pub mod form;
pub mod history;
pub mod parser;
pub mod resolver;
pub mod session;
pub mod store;
pub mod validator;

pub use autocomplete::{AutocompleteResult, Completion, CompletionMode};
pub use builtins::register_builtins;
pub use commands::{Command, CommandNode, CommandTree, Context, Handler, NodeId};
pub use error::{SchemaError, ValidationError};
pub use filesystem::{FileSystem, LocalFs, VirtualFs};
pub use form::{CorrectionForm, FieldRef, FieldState};
pub use history::{Direction, History};
pub use parser::{ParsedLine, parse_line};
pub use session::{Session, Submission};
pub use store::{Preferences, SessionState, Store, YamlStore};
