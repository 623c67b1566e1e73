//! Command declaration and dispatch capabilities.
//!
//! This module provides:
//! - [`Command`], a builder describing one command and its subcommands
//! - [`Handler`], the capability invoked with prepared parameters
//! - [`Context`], session state handed to handlers
//! - [`CommandTree`], the arena holding every registered command
//!
//! # Architecture
//!
//! Commands are declared with [`Command`] and composed into a
//! [`CommandTree`] with [`CommandTree::add_command`]. Every node except a
//! help node receives a generated `help` child whose action renders usage
//! for its parent.

mod help;
mod tree;

pub use help::render_help;
pub use tree::{CommandNode, CommandTree, NodeId};

use std::fmt;
use std::path::PathBuf;

use crate::core::store::Preferences;
use crate::models::{ArgumentSpec, Message, OptionSpec, Prepared};

// =============================================================================
// Handler
// =============================================================================

/// Session state visible to handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct Context {
    pub cwd: PathBuf,
    pub preferences: Preferences,
    /// Set by a handler to ask the host to end the session.
    pub exit_requested: bool,
}

impl Context {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            preferences: Preferences::default(),
            exit_requested: false,
        }
    }
}

/// Action bound to a command.
///
/// Closures with the matching signature implement this trait.
pub trait Handler {
    fn call(&self, ctx: &mut Context, arguments: &Prepared, options: &Prepared)
    -> Option<Message>;
}

impl<F> Handler for F
where
    F: Fn(&mut Context, &Prepared, &Prepared) -> Option<Message>,
{
    fn call(
        &self,
        ctx: &mut Context,
        arguments: &Prepared,
        options: &Prepared,
    ) -> Option<Message> {
        self(ctx, arguments, options)
    }
}

/// What a node does when dispatched.
pub(crate) enum Action {
    /// Render help for the parent node.
    Help,
    Run(Box<dyn Handler>),
    /// No handler registered; dispatch lists subcommands.
    Missing,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => f.write_str("Help"),
            Self::Run(_) => f.write_str("Run(..)"),
            Self::Missing => f.write_str("Missing"),
        }
    }
}

// =============================================================================
// Command Builder
// =============================================================================

/// Declaration of a command, consumed by [`CommandTree::add_command`].
pub struct Command {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) help: Option<String>,
    pub(crate) arguments: Vec<ArgumentSpec>,
    pub(crate) options: Vec<OptionSpec>,
    pub(crate) allowed_arguments: Option<Vec<String>>,
    pub(crate) allowed_options: Option<Vec<String>>,
    pub(crate) requires_confirmation: bool,
    pub(crate) handler: Option<Box<dyn Handler>>,
    pub(crate) subcommands: Vec<Command>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            aliases: Vec::new(),
            help: None,
            arguments: Vec::new(),
            options: Vec::new(),
            allowed_arguments: None,
            allowed_options: None,
            requires_confirmation: false,
            handler: None,
            subcommands: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().trim().to_string());
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    pub fn argument(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    /// Restrict inherited arguments to the named ones (empty = none).
    pub fn allowed_arguments<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.allowed_arguments = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict inherited options to those whose name or alias is listed.
    pub fn allowed_options<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.allowed_options = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn requires_confirmation(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Name and aliases.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arguments", &self.arguments.len())
            .field("options", &self.options.len())
            .field("subcommands", &self.subcommands)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
