//! Command-chain resolution.
//!
//! Walks the command words of a line through the [`CommandTree`] and
//! collects the argument and option specs visible at the deepest match.
//!
//! Specs accumulate from the root down the chain. The deepest node's
//! `allowed_arguments` / `allowed_options` lists then filter the
//! accumulated set: `None` keeps everything, an empty list drops
//! everything, otherwise a spec survives when its name (or, for options,
//! one of its aliases) is listed.

use tracing::debug;

use crate::core::commands::{CommandTree, NodeId};
use crate::models::{ArgumentSpec, OptionSpec};

/// Specs visible at a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope<'t> {
    pub arguments: Vec<&'t ArgumentSpec>,
    pub options: Vec<&'t OptionSpec>,
}

/// Result of walking a line's command words.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<'t> {
    /// Matched nodes, root first. Never empty.
    pub chain: Vec<NodeId>,
    pub scope: Scope<'t>,
    /// Words from the first unmatched one onwards.
    pub unknown: Vec<String>,
}

impl Resolution<'_> {
    /// Deepest matched node.
    pub fn target(&self) -> NodeId {
        // The chain always holds at least the root.
        self.chain[self.chain.len() - 1]
    }

    pub fn is_complete(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Match `words` against the tree, one level per word.
///
/// Matching stops at the first word that is neither a name nor an alias of
/// a child; that word and everything after it are reported as unknown.
pub fn resolve<'t, S: AsRef<str>>(tree: &'t CommandTree, words: &[S]) -> Resolution<'t> {
    let mut chain = vec![tree.root()];
    let mut consumed = 0;

    for word in words {
        let current = chain[chain.len() - 1];
        match tree.child(current, word.as_ref()) {
            Some(child) => {
                chain.push(child);
                consumed += 1;
            }
            None => break,
        }
    }

    let unknown = words[consumed..]
        .iter()
        .map(|w| w.as_ref().to_string())
        .collect::<Vec<String>>();
    debug!(depth = chain.len() - 1, ?unknown, "resolved command chain");

    Resolution {
        scope: scope(tree, &chain),
        chain,
        unknown,
    }
}

/// Specs visible at the last node of `chain` (root first).
pub fn scope<'t>(tree: &'t CommandTree, chain: &[NodeId]) -> Scope<'t> {
    let Some(&last) = chain.last() else {
        return Scope::default();
    };

    let mut arguments: Vec<&ArgumentSpec> = chain
        .iter()
        .flat_map(|&id| tree.node(id).arguments.iter())
        .collect();
    let mut options: Vec<&OptionSpec> = chain
        .iter()
        .flat_map(|&id| tree.node(id).options.iter())
        .collect();

    let node = tree.node(last);
    if let Some(allowed) = &node.allowed_arguments {
        arguments.retain(|spec| allowed.iter().any(|name| *name == spec.name));
    }
    if let Some(allowed) = &node.allowed_options {
        options.retain(|spec| allowed.iter().any(|name| spec.matches(name)));
    }

    Scope { arguments, options }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::Command;
    use crate::models::ValueType;
    use pretty_assertions::assert_eq;

    fn tree() -> CommandTree {
        let mut tree = CommandTree::new();
        tree.add_command(
            &[] as &[&str],
            Command::new("inductor")
                .alias("ind")
                .argument(ArgumentSpec::new("name", ValueType::String))
                .option(OptionSpec::new("base-metal", ValueType::String).with_alias("bm"))
                .option(OptionSpec::new("turns", ValueType::Float))
                .subcommand(
                    Command::new("add")
                        .option(OptionSpec::new("width", ValueType::Float).optional()),
                )
                .subcommand(
                    Command::new("remove")
                        .allowed_arguments(["name"])
                        .allowed_options(["bm"]),
                )
                .subcommand(
                    Command::new("list")
                        .allowed_arguments(Vec::<String>::new())
                        .allowed_options(Vec::<String>::new()),
                ),
        )
        .unwrap();
        tree
    }

    fn option_names(resolution: &Resolution<'_>) -> Vec<String> {
        resolution.scope.options.iter().map(|o| o.name.clone()).collect()
    }

    #[test]
    fn test_specs_accumulate_along_chain() {
        let tree = tree();
        let resolution = resolve(&tree, &["inductor", "add"]);
        assert!(resolution.is_complete());
        assert_eq!(resolution.chain.len(), 3);
        assert_eq!(option_names(&resolution), vec!["base-metal", "turns", "width"]);
        assert_eq!(resolution.scope.arguments.len(), 1);
    }

    #[test]
    fn test_filters_match_names_and_aliases() {
        let tree = tree();
        let resolution = resolve(&tree, &["ind", "remove"]);
        assert_eq!(option_names(&resolution), vec!["base-metal"]);
        assert_eq!(resolution.scope.arguments[0].name, "name");
    }

    #[test]
    fn test_empty_filter_drops_everything() {
        let tree = tree();
        let resolution = resolve(&tree, &["inductor", "list"]);
        assert!(resolution.scope.arguments.is_empty());
        assert!(resolution.scope.options.is_empty());
    }

    #[test]
    fn test_unknown_words_stop_the_walk() {
        let tree = tree();
        let resolution = resolve(&tree, &["inductor", "paint", "add"]);
        assert!(!resolution.is_complete());
        assert_eq!(resolution.unknown, vec!["paint", "add"]);
        assert_eq!(tree.path(resolution.target()), vec!["inductor"]);
    }

    #[test]
    fn test_empty_line_resolves_to_root() {
        let tree = tree();
        let resolution = resolve(&tree, &[] as &[&str]);
        assert_eq!(resolution.target(), tree.root());
        assert!(resolution.is_complete());
        assert_eq!(resolution.scope, Scope::default());
    }

    #[test]
    fn test_help_sees_nothing() {
        let tree = tree();
        let resolution = resolve(&tree, &["inductor", "help"]);
        assert!(resolution.scope.options.is_empty());
        assert!(resolution.scope.arguments.is_empty());
    }
}
