//! Validation of a resolved line.
//!
//! Produces the prepared argument and option maps together with at most one
//! [`ValidationError`], picked by priority: unknown command, then argument
//! errors, then option errors. Every pass runs regardless, so the prepared
//! maps also hold whatever the user got right.

mod arguments;
mod options;

pub use arguments::validate_arguments;
pub use options::validate_options;

use tracing::debug;

use crate::core::error::ValidationError;
use crate::core::parser::ParsedLine;
use crate::core::resolver::Resolution;
use crate::models::Prepared;

/// Prepared parameters plus the highest-priority failure, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct Validation {
    pub arguments: Prepared,
    pub options: Prepared,
    pub result: Result<(), ValidationError>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Validate `parsed` against the specs visible in `resolution`.
pub fn validate(resolution: &Resolution<'_>, parsed: &ParsedLine) -> Validation {
    let mut arguments = Prepared::new();
    let mut options = Prepared::new();

    let commands = if resolution.is_complete() {
        Ok(())
    } else {
        Err(ValidationError::UnknownCommand {
            words: resolution.unknown.clone(),
        })
    };
    let argument_check =
        validate_arguments(&resolution.scope.arguments, &parsed.arguments, &mut arguments);
    let option_check = validate_options(&resolution.scope.options, &parsed.options, &mut options);

    let result = commands.and(argument_check).and(option_check);
    if let Err(err) = &result {
        debug!(%err, "validation failed");
    }

    Validation {
        arguments,
        options,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::{Command, CommandTree};
    use crate::core::parser::parse_line;
    use crate::core::resolver::resolve;
    use crate::models::{ArgumentSpec, OptionSpec, Value, ValueType};
    use pretty_assertions::assert_eq;

    fn tree() -> CommandTree {
        let mut tree = CommandTree::new();
        tree.add_command(
            &[] as &[&str],
            Command::new("inductor").subcommand(
                Command::new("add")
                    .argument(ArgumentSpec::new("label", ValueType::String))
                    .option(OptionSpec::new("base-metal", ValueType::String))
                    .option(OptionSpec::new("turns", ValueType::Float)),
            ),
        )
        .unwrap();
        tree
    }

    fn check(tree: &CommandTree, line: &str) -> Validation {
        let parsed = parse_line(line);
        let resolution = resolve(tree, &parsed.commands);
        validate(&resolution, &parsed)
    }

    #[test]
    fn test_valid_line() {
        let tree = tree();
        let validation = check(&tree, "inductor add 'L1' --base-metal=\"M1\" --turns=3.5");
        assert!(validation.is_ok());
        assert_eq!(validation.arguments.str("label"), Some("L1"));
        assert_eq!(validation.options.str("base_metal"), Some("M1"));
        assert_eq!(validation.options.get("turns"), Some(&Value::Float(3.5)));
    }

    #[test]
    fn test_unknown_command_first() {
        let tree = tree();
        let validation = check(&tree, "inductor paint --turns=x");
        assert_eq!(
            validation.result,
            Err(ValidationError::UnknownCommand {
                words: vec!["paint".to_string()]
            })
        );
    }

    #[test]
    fn test_arguments_before_options() {
        let tree = tree();
        let validation = check(&tree, "inductor add --turns=x");
        assert!(matches!(
            validation.result,
            Err(ValidationError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_partial_results_survive_errors() {
        let tree = tree();
        let validation = check(&tree, "inductor add 'L1' --turns=3.5");
        assert!(matches!(
            validation.result,
            Err(ValidationError::MissingRequiredOption { .. })
        ));
        assert_eq!(validation.arguments.str("label"), Some("L1"));
        assert_eq!(validation.options.float("turns"), Some(3.5));
    }
}
