//! Usage text for the generated `help` commands.

use std::fmt::Write as _;

use super::{CommandTree, NodeId};
use crate::config::NO_DESCRIPTION;
use crate::core::error::render_groups;
use crate::core::resolver::scope;

const INDENT: &str = "    ";

/// Render usage for the node `id`: description, visible arguments and
/// options, then subcommands other than `help`. Each section is sorted by
/// name.
pub fn render_help(tree: &CommandTree, id: NodeId) -> String {
    let node = tree.node(id);
    let mut visible = scope(tree, &tree.lineage(id));
    visible.arguments.sort_by(|a, b| a.name.cmp(&b.name));
    visible.options.sort_by(|a, b| a.name.cmp(&b.name));
    let path = tree.path(id).join(" ");

    let mut out = String::new();
    let aliases = if node.aliases.is_empty() {
        "no aliases".to_string()
    } else {
        node.aliases.join(", ")
    };
    let _ = writeln!(
        out,
        "Usage: {} (aliases: {}) [COMMAND] [ARGUMENTS] [OPTIONS]",
        if path.is_empty() { "<command>" } else { path.as_str() },
        aliases
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}{}", INDENT, node.help.as_deref().unwrap_or(NO_DESCRIPTION));

    if !visible.arguments.is_empty() {
        let _ = write!(out, "\nArguments:\n");
        for spec in &visible.arguments {
            let _ = writeln!(out);
            entry(&mut out, &spec.name, spec.help.as_deref());
            if let Some(allowed) = &spec.allowed {
                detail(&mut out, "allowed values", &allowed.to_string());
            }
            detail(&mut out, "type", spec.value_type.name());
        }
    }

    if !visible.options.is_empty() {
        let _ = write!(out, "\nOptions:\n");
        for spec in &visible.options {
            let _ = writeln!(out);
            entry(&mut out, &format!("--{}", spec.name), spec.help.as_deref());
            if !spec.aliases.is_empty() {
                let aliases: Vec<String> =
                    spec.aliases.iter().map(|a| format!("--{}", a)).collect();
                detail(&mut out, "aliases", &aliases.join(", "));
            }
            if !spec.prerequisites.is_empty() {
                detail(&mut out, "prerequisites", &render_groups(&spec.prerequisites));
            }
            if let Some(allowed) = &spec.allowed {
                detail(&mut out, "allowed values", &allowed.to_string());
            }
            if let Some(default) = &spec.default {
                detail(&mut out, "default", &default.to_string());
            }
            detail(&mut out, "required", if spec.required { "yes" } else { "no" });
            detail(&mut out, "type", spec.value_type.name());
        }
    }

    let mut commands: Vec<_> = tree
        .children(id)
        .filter(|(_, child)| !child.is_help())
        .collect();
    commands.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));
    if !commands.is_empty() {
        let _ = write!(out, "\nCommands:\n");
        for (_, child) in commands {
            let _ = writeln!(out);
            entry(&mut out, &child.name, child.help.as_deref());
            if !child.aliases.is_empty() {
                detail(&mut out, "aliases", &child.aliases.join(", "));
            }
        }
    }

    out.trim_end().to_string()
}

fn entry(out: &mut String, name: &str, help: Option<&str>) {
    let _ = writeln!(out, "{}{}: {}", INDENT, name, help.unwrap_or(NO_DESCRIPTION));
}

fn detail(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{}{}{} = {}", INDENT, INDENT, key, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::Command;
    use crate::models::{ArgumentSpec, OptionSpec, ValueType};

    #[test]
    fn test_help_lists_visible_specs_and_children() {
        let mut tree = CommandTree::new();
        tree.add_command(
            &[] as &[&str],
            Command::new("inductor")
                .alias("ind")
                .help("Inductor tools.")
                .option(
                    OptionSpec::new("thickness", ValueType::Float)
                        .with_help("Metal thickness.")
                        .with_prerequisite(["resistivity", "conductivity"]),
                )
                .subcommand(Command::new("add").help("Add an inductor.")),
        )
        .unwrap();

        let id = tree.find(&["inductor"]).unwrap();
        let text = render_help(&tree, id);

        assert!(text.starts_with("Usage: inductor (aliases: ind)"));
        assert!(text.contains("    Inductor tools."));
        assert!(text.contains("--thickness: Metal thickness."));
        assert!(text.contains("prerequisites = (--resistivity, --conductivity)"));
        assert!(text.contains("type = float"));
        assert!(text.contains("add: Add an inductor."));
        assert!(!text.contains("help: "));
    }

    #[test]
    fn test_help_without_description() {
        let mut tree = CommandTree::new();
        tree.add_command(&[] as &[&str], Command::new("clear")).unwrap();
        let text = render_help(&tree, tree.find(&["clear"]).unwrap());
        assert_eq!(
            text,
            format!(
                "Usage: clear (aliases: no aliases) [COMMAND] [ARGUMENTS] [OPTIONS]\n\n    {}",
                NO_DESCRIPTION
            )
        );
    }

    #[test]
    fn test_root_help_lists_top_level_commands() {
        let mut tree = CommandTree::new();
        tree.add_command(&[] as &[&str], Command::new("exit").help("Leave."))
            .unwrap();
        let text = render_help(&tree, tree.root());
        assert!(text.starts_with("Usage: <command>"));
        assert!(text.contains("exit: Leave."));
    }

    #[test]
    fn test_help_sections_sorted_by_name() {
        let mut tree = CommandTree::new();
        tree.add_command(
            &[] as &[&str],
            Command::new("layout")
                .argument(ArgumentSpec::new("zeta", ValueType::String))
                .argument(ArgumentSpec::new("alpha", ValueType::String))
                .option(OptionSpec::new("zoom", ValueType::Integer))
                .option(OptionSpec::new("apex", ValueType::Integer))
                .subcommand(Command::new("zz"))
                .subcommand(Command::new("aa")),
        )
        .unwrap();

        let text = render_help(&tree, tree.find(&["layout"]).unwrap());
        let at = |needle: &str| text.find(needle).unwrap();
        assert!(at("    alpha:") < at("    zeta:"));
        assert!(at("--apex:") < at("--zoom:"));
        assert!(at("    aa:") < at("    zz:"));
    }
}
