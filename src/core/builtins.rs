//! Commands every session carries.
//!
//! - `exit` ends the session
//! - `helper --on | --off` toggles the correction form; bare `helper` reports it
//! - `theme` shows the current theme; `theme set --theme-mode=<light|dark|system>`
//!   changes it

use crate::core::commands::{Command, CommandTree, Context};
use crate::core::error::SchemaError;
use crate::models::{AllowedValues, Message, OptionSpec, Prepared, ValueType};

const THEMES: [&str; 3] = ["Light", "Dark", "System"];

/// Register the built-in commands at the top level of `tree`.
pub fn register_builtins(tree: &mut CommandTree) -> Result<(), SchemaError> {
    let top: &[&str] = &[];
    tree.add_command(top, exit())?;
    tree.add_command(top, helper())?;
    tree.add_command(top, theme())?;
    Ok(())
}

fn exit() -> Command {
    Command::new("exit")
        .alias("quit")
        .help("Leave the session.")
        .handler(|ctx: &mut Context, _: &Prepared, _: &Prepared| -> Option<Message> {
            ctx.exit_requested = true;
            None
        })
}

fn helper() -> Command {
    Command::new("helper")
        .help("Turn the correction form on or off.")
        .option(OptionSpec::new("on", ValueType::Boolean).with_help("Enable the form."))
        .option(OptionSpec::new("off", ValueType::Boolean).with_help("Disable the form."))
        .handler(set_helper)
}

/// Apply `--on`/`--off` silently; with neither, report the current state.
fn set_helper(ctx: &mut Context, _: &Prepared, options: &Prepared) -> Option<Message> {
    let helper = &mut ctx.preferences.helper;
    if let Some(on) = options.bool("on") {
        *helper = on;
    } else if let Some(off) = options.bool("off") {
        *helper = !off;
    } else {
        return Some(Message::success(if *helper { "On" } else { "Off" }));
    }
    None
}

fn theme() -> Command {
    let mode = OptionSpec::new("theme-mode", ValueType::String)
        .with_alias("mode")
        .with_help("Theme to apply.")
        .with_allowed(AllowedValues::literals([THEMES]));

    Command::new("theme")
        .help("Show the current theme.")
        .handler(|ctx: &mut Context, _: &Prepared, _: &Prepared| -> Option<Message> {
            Some(Message::success(format!(
                "Current theme: {}",
                ctx.preferences.current_theme
            )))
        })
        .subcommand(
            Command::new("set")
                .help("Change the theme.")
                .option(mode)
                .handler(set_theme),
        )
}

fn set_theme(ctx: &mut Context, _: &Prepared, options: &Prepared) -> Option<Message> {
    let requested = options.str("theme-mode")?;
    // Validation already restricted the value to a known theme.
    let theme = THEMES
        .iter()
        .find(|theme| theme.eq_ignore_ascii_case(requested))?;
    ctx.preferences.current_theme = theme.to_string();
    Some(Message::success(format!("Theme set to {}", theme)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filesystem::VirtualFs;
    use crate::core::session::Session;

    fn session() -> Session {
        let mut tree = CommandTree::new();
        register_builtins(&mut tree).unwrap();
        Session::new(tree).with_filesystem(VirtualFs::new())
    }

    #[test]
    fn test_exit() {
        let mut session = session();
        assert_eq!(session.execute("quit"), None);
        assert!(session.exit_requested());
    }

    #[test]
    fn test_helper_toggle() {
        let mut session = session();
        assert_eq!(session.execute("helper"), Some(Message::success("On")));
        assert_eq!(session.execute("helper --off"), None);
        assert!(!session.context().preferences.helper);
        assert_eq!(session.execute("helper"), Some(Message::success("Off")));
        assert_eq!(session.execute("helper --on"), None);
        assert!(session.context().preferences.helper);
    }

    #[test]
    fn test_theme_set() {
        let mut session = session();
        assert_eq!(
            session.execute("theme set --theme-mode=dark"),
            Some(Message::success("Theme set to Dark"))
        );
        assert_eq!(
            session.execute("theme"),
            Some(Message::success("Current theme: Dark"))
        );
        session.execute("theme set --mode LIGHT");
        assert_eq!(session.context().preferences.current_theme, "Light");
    }

    #[test]
    fn test_theme_set_rejects_unknown() {
        let mut session = session();
        let msg = session.execute("theme set --theme-mode=blue").unwrap();
        assert!(msg.is_error());
        assert_eq!(session.context().preferences.current_theme, "System");
        // The form is staged with the rejected value.
        assert_eq!(session.form().unwrap().options()[0].value, "blue");
    }

    #[test]
    fn test_theme_help() {
        let mut session = session();
        let help = session.execute("theme set help").unwrap();
        assert!(help.text.contains("--theme-mode: Theme to apply."));
        assert!(help.text.contains("allowed values = (light, dark, system)"));
    }
}
