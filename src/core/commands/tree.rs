//! Arena of registered commands.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`], so the
//! parent link is an index rather than a back-reference.

use std::collections::HashSet;

use tracing::debug;

use super::{Action, Command};
use crate::config::{HELP_COMMAND, HELP_DESCRIPTION};
use crate::core::error::SchemaError;
use crate::models::{ArgumentSpec, OptionSpec};

/// Index of a node inside its [`CommandTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A registered command.
#[derive(Debug)]
pub struct CommandNode {
    pub name: String,
    pub aliases: Vec<String>,
    pub help: Option<String>,
    pub arguments: Vec<ArgumentSpec>,
    pub options: Vec<OptionSpec>,
    /// `None` inherits everything; `Some(vec![])` inherits nothing.
    pub allowed_arguments: Option<Vec<String>>,
    pub allowed_options: Option<Vec<String>>,
    pub requires_confirmation: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub(crate) action: Action,
}

impl CommandNode {
    fn from_command(command: &mut Command, parent: Option<NodeId>) -> Self {
        let action = match command.handler.take() {
            Some(handler) => Action::Run(handler),
            None => Action::Missing,
        };
        Self {
            name: std::mem::take(&mut command.name),
            aliases: std::mem::take(&mut command.aliases),
            help: command.help.take(),
            arguments: std::mem::take(&mut command.arguments),
            options: std::mem::take(&mut command.options),
            allowed_arguments: command.allowed_arguments.take(),
            allowed_options: command.allowed_options.take(),
            requires_confirmation: command.requires_confirmation,
            parent,
            children: Vec::new(),
            action,
        }
    }

    fn help_for(parent: NodeId) -> Self {
        Self {
            name: HELP_COMMAND.to_string(),
            aliases: Vec::new(),
            help: Some(HELP_DESCRIPTION.to_string()),
            arguments: Vec::new(),
            options: Vec::new(),
            allowed_arguments: Some(Vec::new()),
            allowed_options: Some(Vec::new()),
            requires_confirmation: false,
            parent: Some(parent),
            children: Vec::new(),
            action: Action::Help,
        }
    }

    /// True when `word` is this node's name or one of its aliases.
    pub fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|alias| alias == word)
    }

    pub fn is_help(&self) -> bool {
        matches!(self.action, Action::Help)
    }

    pub fn has_handler(&self) -> bool {
        matches!(self.action, Action::Run(_))
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

// =============================================================================
// Command Tree
// =============================================================================

/// All registered commands, rooted at an unnamed node.
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    const ROOT: NodeId = NodeId(0);

    /// Empty tree: the root plus its `help` child.
    pub fn new() -> Self {
        let mut root = Command::new("");
        let mut tree = Self {
            nodes: vec![CommandNode::from_command(&mut root, None)],
        };
        tree.attach_help(Self::ROOT);
        tree
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Node by id. Ids are only minted by this tree.
    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &CommandNode)> {
        self.node(id)
            .children
            .iter()
            .map(|&child| (child, self.node(child)))
    }

    /// Child of `id` named or aliased `word`.
    pub fn child(&self, id: NodeId, word: &str) -> Option<NodeId> {
        self.children(id)
            .find(|(_, node)| node.matches(word))
            .map(|(child, _)| child)
    }

    /// Node at `path` from the root, matching names and aliases.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        path.iter()
            .try_fold(Self::ROOT, |id, word| self.child(id, word.as_ref()))
    }

    /// Ids from the root down to `id`, inclusive.
    pub fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Canonical names from the root to `id`, root excluded.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        self.lineage(id)
            .into_iter()
            .skip(1)
            .map(|node| self.node(node).name.as_str())
            .collect()
    }

    /// Register `command` (and its subcommands) under the node at `parent`.
    ///
    /// The whole declaration is checked before anything is inserted, so a
    /// rejected command leaves the tree untouched.
    pub fn add_command<S: AsRef<str>>(
        &mut self,
        parent: &[S],
        command: Command,
    ) -> Result<NodeId, SchemaError> {
        let parent_id = self.find(parent).ok_or_else(|| SchemaError::UnknownParent {
            path: parent.iter().map(|s| s.as_ref().to_string()).collect(),
        })?;

        let taken: HashSet<&str> = self
            .children(parent_id)
            .flat_map(|(_, node)| node.keys())
            .collect();
        let parent_name = self.path(parent_id).join(" ");
        check_command(&command, &parent_name, &taken)?;

        let id = self.insert(parent_id, command);
        debug!(command = %self.path(id).join(" "), "registered command");
        Ok(id)
    }

    pub(crate) fn action(&self, id: NodeId) -> &Action {
        &self.node(id).action
    }

    fn insert(&mut self, parent: NodeId, mut command: Command) -> NodeId {
        let id = NodeId(self.nodes.len());
        let subcommands = std::mem::take(&mut command.subcommands);
        self.nodes.push(CommandNode::from_command(&mut command, Some(parent)));
        self.nodes[parent.0].children.push(id);

        self.attach_help(id);
        for sub in subcommands {
            self.insert(id, sub);
        }
        id
    }

    fn attach_help(&mut self, parent: NodeId) {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode::help_for(parent));
        self.nodes[parent.0].children.push(id);
    }
}

/// Validate a declaration against the keys already used by its siblings.
fn check_command(
    command: &Command,
    parent: &str,
    taken: &HashSet<&str>,
) -> Result<(), SchemaError> {
    if command.name.is_empty() || command.aliases.iter().any(String::is_empty) {
        return Err(SchemaError::EmptyName);
    }
    for key in command.keys() {
        if taken.contains(key) {
            return Err(SchemaError::DuplicateName {
                parent: parent.to_string(),
                name: key.to_string(),
            });
        }
    }
    for spec in &command.arguments {
        spec.check()?;
    }
    for spec in &command.options {
        spec.check()?;
    }

    let path = if parent.is_empty() {
        command.name.clone()
    } else {
        format!("{} {}", parent, command.name)
    };
    let mut siblings: HashSet<&str> = HashSet::from([HELP_COMMAND]);
    for sub in &command.subcommands {
        check_command(sub, &path, &siblings)?;
        siblings.extend(sub.keys());
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
