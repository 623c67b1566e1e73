use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use termform::config::EngineConfig;
use termform::core::{
    AutocompleteResult, CommandTree, Session, Store, YamlStore, register_builtins,
};
use termform::models::Message;

#[derive(Parser, Debug)]
#[command(name = "termform", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session file; overrides `store_path` from the config
    #[arg(long)]
    store: Option<PathBuf>,

    /// Start with the correction form disabled
    #[arg(long)]
    no_helper: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    // RUST_LOG wins over the config file.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut tree = CommandTree::new();
    register_builtins(&mut tree)?;
    let mut session = Session::new(tree).with_config(&config);

    let store = YamlStore::new(cli.store.unwrap_or_else(|| config.store_path.clone()));
    match store.load() {
        Ok(state) => session.restore(state),
        Err(err) => warn!(%err, "starting with a fresh session"),
    }
    if cli.no_helper {
        session.context_mut().preferences.helper = false;
    }

    let mut lines = io::stdin().lock().lines();
    let mut out = io::stdout().lock();

    while !session.exit_requested() {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        // A trailing tab asks for completion at the end of the line.
        if let Some(partial) = line.strip_suffix('\t') {
            show_completion(&session, partial, &mut out)?;
            continue;
        }

        if let Some(message) = session.execute(&line) {
            writeln!(out, "{}", message)?;
        }
        follow_up(&mut session, &line, &mut lines, &mut out)?;
        persist(&session, &store);
    }

    persist(&session, &store);
    Ok(())
}

fn persist(session: &Session, store: &YamlStore) {
    if let Err(err) = store.save(&session.snapshot()) {
        warn!(%err, "failed to save session");
    }
}

fn show_completion(session: &Session, partial: &str, out: &mut impl Write) -> io::Result<()> {
    let cursor = partial.chars().count();
    let completion = session.complete(partial, cursor);
    match &completion.result {
        AutocompleteResult::Insert(_) => {
            let (line, _) = completion.apply(partial, cursor);
            writeln!(out, "{}", line)
        }
        AutocompleteResult::Hints(candidates) => {
            writeln!(out, "{}", Message::hint(candidates.join("  ")))
        }
        AutocompleteResult::NoMatch => writeln!(out, "{}", Message::hint("no completions")),
    }
}

/// Read one answer; anything but `y`/`yes` (or end of input) is a no.
fn ask(
    prompt: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    out: &mut impl Write,
) -> io::Result<bool> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let answer = lines.next().transpose()?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Handle a pending confirmation or correction form left by the last line.
fn follow_up(
    session: &mut Session,
    line: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    out: &mut impl Write,
) -> io::Result<()> {
    loop {
        if session.awaiting_confirmation() {
            if !ask("Proceed? [y/N] ", lines, out)? {
                session.reset();
                return writeln!(out, "{}", Message::hint("Cancelled."));
            }
            session.confirm();
        } else if session.form().is_some() {
            if !fill_form(session, lines, out)? {
                session.reset();
                return writeln!(out, "{}", Message::hint("Cancelled."));
            }
        } else {
            return Ok(());
        }

        let Some(result) = session.submit_form().or_else(|| session.submit(line)) else {
            return Ok(());
        };
        match result {
            Ok(submission) => {
                if let Some(message) = session.dispatch(&submission) {
                    writeln!(out, "{}", message)?;
                }
                return Ok(());
            }
            Err(err) => writeln!(out, "{}", Message::error(err.to_string()))?,
        }
    }
}

/// Prompt for each field that still needs input. False when cancelled.
fn fill_form(
    session: &mut Session,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    out: &mut impl Write,
) -> io::Result<bool> {
    writeln!(out, "{}", Message::hint("Fill in the fields below; leave one blank to cancel."))?;

    while let Some(form) = session.form() {
        let Some(next) = form.next_incomplete() else {
            break;
        };
        let Some(field) = form.field(next) else {
            break;
        };
        for info in field.information.lines() {
            writeln!(out, "    {}", info)?;
        }
        write!(out, "{}: ", field.key)?;
        out.flush()?;

        let value = lines.next().transpose()?.unwrap_or_default();
        if value.trim().is_empty() {
            return Ok(false);
        }
        if let Some(form) = session.form_mut() {
            form.set(next, value.trim());
        }
    }

    let composed = session.form().map(|form| form.compose_line()).unwrap_or_default();
    ask(&format!("Submit `{}`? [y/N] ", composed), lines, out)
}
