//! End-to-end flows through the public API.

use pretty_assertions::assert_eq;
use termform::core::{
    AutocompleteResult, Command, CommandTree, Context, Direction, FieldRef, Session, Store,
    ValidationError, VirtualFs, YamlStore, register_builtins,
};
use termform::models::{AllowedValues, ArgumentSpec, Message, OptionSpec, Prepared, Status, ValueType};

fn add_inductor(_: &mut Context, arguments: &Prepared, options: &Prepared) -> Option<Message> {
    let label = arguments.str("label").unwrap_or("unnamed");
    let metal = options.str("base-metal")?;
    let turns = options.float("turns")?;
    Some(Message::success(format!("{} on {} with {} turns", label, metal, turns)))
}

fn session() -> Session {
    let mut tree = CommandTree::new();
    register_builtins(&mut tree).unwrap();
    tree.add_command(
        &[] as &[&str],
        Command::new("inductor")
            .alias("ind")
            .help("Inductor design tools.")
            .option(OptionSpec::new("base-metal", ValueType::String).with_alias("metal"))
            .option(
                OptionSpec::new("turns", ValueType::Float)
                    .with_allowed(AllowedValues::ranges([(0.5, 100.0)])),
            )
            .subcommand(
                Command::new("add")
                    .argument(ArgumentSpec::new("label", ValueType::String))
                    .handler(add_inductor),
            )
            .subcommand(
                Command::new("list")
                    .allowed_arguments(Vec::<String>::new())
                    .allowed_options(Vec::<String>::new())
                    .handler(|_: &mut Context, _: &Prepared, _: &Prepared| -> Option<Message> {
                        Some(Message::success("L1"))
                    }),
            )
            .subcommand(
                Command::new("purge")
                    .allowed_arguments(Vec::<String>::new())
                    .allowed_options(Vec::<String>::new())
                    .requires_confirmation()
                    .handler(|_: &mut Context, _: &Prepared, _: &Prepared| -> Option<Message> {
                        Some(Message::success("purged"))
                    }),
            ),
    )
    .unwrap();

    Session::new(tree)
        .with_filesystem(VirtualFs::new().with_entry("/lib/m1.yaml").with_entry("/lib/m2.yaml"))
        .with_cwd("/lib")
}

#[test]
fn test_add_inductor_end_to_end() {
    let mut session = session();
    let reply = session.execute("ind add 'L1' --metal=\"M1\" --turns=3.5");
    assert_eq!(reply, Some(Message::success("L1 on M1 with 3.5 turns")));
    assert_eq!(
        session.history().entries(),
        vec!["ind add 'L1' --metal=\"M1\" --turns=3.5"]
    );
}

#[test]
fn test_inherited_options_are_filtered() {
    let mut session = session();
    assert_eq!(session.execute("inductor list"), Some(Message::success("L1")));

    let reply = session.execute("inductor list --turns=2").unwrap();
    assert_eq!(reply.status, Status::Error);
    assert_eq!(reply.text, "Non existing options: --turns");
}

#[test]
fn test_range_violation_then_form_correction() {
    let mut session = session();
    let err = session
        .submit("inductor add 'L1' --base-metal=M1 --turns=250")
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidOptionValue { .. }));
    assert_eq!(
        err.to_string(),
        "Options with invalid value: --turns=250 (float, allowed: (0.5, 100))"
    );

    let form = session.form_mut().unwrap();
    assert_eq!(form.next_incomplete(), Some(FieldRef::Option(1)));
    form.set(FieldRef::Option(1), "12");

    let submission = session.submit_form().unwrap().unwrap();
    assert_eq!(
        session.dispatch(&submission),
        Some(Message::success("L1 on M1 with 12 turns"))
    );
}

#[test]
fn test_confirmation_round_trip() {
    let mut session = session();
    let warning = session.execute("inductor purge").unwrap();
    assert_eq!(warning.status, Status::Warning);

    session.confirm();
    assert_eq!(session.execute("inductor purge"), Some(Message::success("purged")));
    assert_eq!(session.history().entries(), vec!["inductor purge"]);
}

#[test]
fn test_completion_modes() {
    let session = session();

    let completion = session.complete("ind a", 5);
    assert_eq!(completion.result, AutocompleteResult::Insert("dd ".to_string()));

    let completion = session.complete("inductor add --me", 17);
    assert_eq!(completion.result, AutocompleteResult::Insert("tal".to_string()));

    let completion = session.complete("load \"m", 7);
    assert_eq!(
        completion.result,
        AutocompleteResult::Hints(vec!["m1.yaml".to_string(), "m2.yaml".to_string()])
    );
}

#[test]
fn test_history_browse_and_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlStore::new(dir.path().join("clidata.yaml"));

    let mut session = session();
    session.execute("theme set --theme-mode=dark");
    session.execute("inductor list");
    session.execute("inductor list");
    assert_eq!(session.browse(Direction::Older), "inductor list");
    assert_eq!(session.browse(Direction::Older), "theme set --theme-mode=dark");
    store.save(&session.snapshot()).unwrap();

    let mut restored = self::session();
    restored.restore(store.load().unwrap());
    assert_eq!(restored.history().len(), 2);
    assert_eq!(restored.context().preferences.current_theme, "Dark");
    assert_eq!(restored.context().cwd, std::path::PathBuf::from("/lib"));
}
