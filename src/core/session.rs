//! Interactive session: the entry point hosts drive line by line.
//!
//! A [`Session`] owns the command tree, the history ledger and the handler
//! [`Context`]. Each submitted line is recorded, parsed, resolved and
//! validated. Valid lines become a [`Submission`] for [`Session::dispatch`].
//!
//! Commands flagged for confirmation are held back once: the first valid
//! submission stages it, [`Session::confirm`] marks it confirmed, and the
//! next equivalent submission goes through. Equivalence compares the
//! resolved command and the prepared parameters, not the raw text.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::core::autocomplete::{self, Completion};
use crate::core::commands::{Action, Command, CommandTree, Context, NodeId, render_help};
use crate::core::error::{SchemaError, ValidationError};
use crate::core::filesystem::{FileSystem, LocalFs};
use crate::core::form::CorrectionForm;
use crate::core::history::{Direction, History};
use crate::core::parser::{ParsedLine, parse_line};
use crate::core::resolver::{Resolution, resolve};
use crate::core::store::SessionState;
use crate::core::validator::validate;
use crate::models::{Message, Prepared, Value};

/// A validated line, ready for dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub node: NodeId,
    /// Canonical command path, root excluded.
    pub command: Vec<String>,
    pub arguments: Prepared,
    pub options: Prepared,
}

#[derive(Debug)]
struct Pending {
    node: NodeId,
    arguments: Prepared,
    options: Prepared,
    confirmed: bool,
}

impl Pending {
    /// Same node and same coerced parameters. Staged raw entries, such as a
    /// bare optional string flag, carry no value and are ignored.
    fn matches(&self, submission: &Submission) -> bool {
        self.node == submission.node
            && coerced(&self.arguments).eq(coerced(&submission.arguments))
            && coerced(&self.options).eq(coerced(&submission.options))
    }
}

fn coerced(prepared: &Prepared) -> impl Iterator<Item = (&String, &Value)> {
    prepared.iter().filter(|(_, value)| !value.is_raw())
}

pub struct Session {
    tree: CommandTree,
    history: History,
    fs: Box<dyn FileSystem>,
    context: Context,
    pending: Option<Pending>,
    form: Option<CorrectionForm>,
}

impl Session {
    /// Session over `tree`, reading the host filesystem from the process's
    /// working directory.
    pub fn new(tree: CommandTree) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            tree,
            history: History::new(),
            fs: Box::new(LocalFs),
            context: Context::new(cwd),
            pending: None,
            form: None,
        }
    }

    pub fn with_filesystem(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.history = History::with_capacity(config.history_capacity);
        self.context.preferences.helper = config.helper;
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.context.cwd = cwd.into();
        self
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn exit_requested(&self) -> bool {
        self.context.exit_requested
    }

    /// Register `command` under the command at `parent` (empty for top level).
    pub fn register<S: AsRef<str>>(
        &mut self,
        parent: &[S],
        command: Command,
    ) -> Result<NodeId, SchemaError> {
        self.tree.add_command(parent, command)
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Record, parse, resolve and validate `line`.
    ///
    /// `None` for a blank line, which is neither recorded nor validated. On
    /// failure with the helper enabled, a [`CorrectionForm`] is staged.
    pub fn submit(&mut self, line: &str) -> Option<Result<Submission, ValidationError>> {
        let parsed = parse_line(line);
        if parsed.is_empty() {
            return None;
        }
        self.history.record(line.trim());
        Some(self.submit_parsed(&parsed))
    }

    /// Resubmit the staged form. The composed line is not recorded.
    pub fn submit_form(&mut self) -> Option<Result<Submission, ValidationError>> {
        let line = self.form.as_ref()?.compose_line();
        debug!(%line, "resubmitting form");
        Some(self.submit_parsed(&parse_line(&line)))
    }

    fn submit_parsed(&mut self, parsed: &ParsedLine) -> Result<Submission, ValidationError> {
        let resolution = resolve(&self.tree, &parsed.commands);
        let validation = validate(&resolution, parsed);
        let node = resolution.target();
        let submission = Submission {
            node,
            command: self.tree.path(node).into_iter().map(str::to_string).collect(),
            arguments: validation.arguments,
            options: validation.options,
        };

        if let Err(err) = validation.result {
            debug!(%err, "line rejected");
            self.form = self.stage_form(&resolution, parsed);
            self.pending = None;
            return Err(err);
        }

        if self.tree.node(node).requires_confirmation {
            let confirmed = self
                .pending
                .as_ref()
                .is_some_and(|pending| pending.confirmed && pending.matches(&submission));
            if !confirmed {
                self.form = self.stage_form(&resolution, parsed);
                self.pending = Some(Pending {
                    node,
                    arguments: submission.arguments,
                    options: submission.options,
                    confirmed: false,
                });
                return Err(ValidationError::ConfirmationRequired {
                    command: submission.command.join(" "),
                });
            }
        }

        self.pending = None;
        self.form = None;
        Ok(submission)
    }

    fn stage_form(&self, resolution: &Resolution<'_>, parsed: &ParsedLine) -> Option<CorrectionForm> {
        let scope = &resolution.scope;
        if !self.context.preferences.helper
            || !resolution.is_complete()
            || (scope.arguments.is_empty() && scope.options.is_empty())
        {
            return None;
        }
        Some(CorrectionForm::new(parsed.commands.clone(), scope, parsed))
    }

    /// Mark the pending confirmation as given. False when nothing is pending.
    pub fn confirm(&mut self) -> bool {
        match &mut self.pending {
            Some(pending) => {
                pending.confirmed = true;
                true
            }
            None => false,
        }
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop pending confirmation, the staged form and the history cursor.
    pub fn reset(&mut self) {
        self.pending = None;
        self.form = None;
        self.history.reset_cursor();
    }

    pub fn form(&self) -> Option<&CorrectionForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut CorrectionForm> {
        self.form.as_mut()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Run the action bound to a submission's command.
    ///
    /// A panicking handler is reported as an error message.
    pub fn dispatch(&mut self, submission: &Submission) -> Option<Message> {
        let node = submission.node;
        match self.tree.action(node) {
            Action::Help => {
                let parent = self.tree.node(node).parent.unwrap_or(self.tree.root());
                Some(Message::success(render_help(&self.tree, parent)))
            }
            Action::Run(handler) => {
                debug!(command = %submission.command.join(" "), "dispatching");
                let context = &mut self.context;
                catch_unwind(AssertUnwindSafe(|| {
                    handler.call(context, &submission.arguments, &submission.options)
                }))
                .unwrap_or_else(|_| {
                    warn!(command = %submission.command.join(" "), "handler panicked");
                    Some(Message::error(format!(
                        "'{}' failed",
                        submission.command.join(" ")
                    )))
                })
            }
            Action::Missing => {
                let names: Vec<&str> = self
                    .tree
                    .children(node)
                    .map(|(_, child)| child.name.as_str())
                    .collect();
                Some(Message::hint(format!(
                    "Available commands: {}",
                    names.join(", ")
                )))
            }
        }
    }

    /// Submit and dispatch `line`, turning failures into messages.
    ///
    /// Blank lines are ignored.
    pub fn execute(&mut self, line: &str) -> Option<Message> {
        match self.submit(line)? {
            Ok(submission) => self.dispatch(&submission),
            Err(err @ ValidationError::ConfirmationRequired { .. }) => {
                Some(Message::warning(err.to_string()))
            }
            Err(err) => Some(Message::error(err.to_string())),
        }
    }

    // =========================================================================
    // Completion and History
    // =========================================================================

    /// Complete the token ending at char offset `cursor`.
    pub fn complete(&self, line: &str, cursor: usize) -> Completion {
        autocomplete::complete(&self.tree, self.fs.as_ref(), &self.context.cwd, line, cursor)
    }

    pub fn record(&mut self, line: &str) {
        self.history.record(line);
    }

    pub fn browse(&mut self, direction: Direction) -> String {
        self.history.browse(direction)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub fn snapshot(&self) -> SessionState {
        SessionState {
            commands_history: self.history.entries(),
            current_working_directory: self.context.cwd.clone(),
            preferences: self.context.preferences.clone(),
        }
    }

    /// Replace history, working directory and preferences with `state`.
    pub fn restore(&mut self, state: SessionState) {
        self.history = History::from_entries(state.commands_history, self.history.capacity());
        self.context.cwd = state.current_working_directory;
        self.context.preferences = state.preferences;
        self.reset();
    }
}
