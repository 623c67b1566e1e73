//! Tab completion for command lines.
//!
//! The token under the cursor selects the completion mode:
//! - `--...` completes option names and aliases visible at the resolved command
//! - a quoted token completes filesystem paths
//! - anything else completes subcommand names
//!
//! One candidate is inserted directly. Several candidates are returned as
//! hints and the line is left unchanged.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::commands::CommandTree;
use crate::core::filesystem::FileSystem;
use crate::core::parser::parse_line;
use crate::core::resolver::resolve;

// ============================================================================
// Public Types
// ============================================================================

/// What the in-progress token is completed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionMode {
    Command,
    Option,
    Path,
}

impl CompletionMode {
    fn from_token(token: &str) -> Self {
        if token.starts_with('-') {
            Self::Option
        } else if token.starts_with(is_quote) {
            Self::Path
        } else {
            Self::Command
        }
    }
}

/// Outcome of a completion attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Text to insert at the cursor.
    Insert(String),
    /// Candidates to show; the line is unchanged.
    Hints(Vec<String>),
    NoMatch,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub mode: CompletionMode,
    /// In-progress token, from its start up to the cursor.
    pub token: String,
    pub result: AutocompleteResult,
}

impl Completion {
    pub fn is_hint_only(&self) -> bool {
        matches!(self.result, AutocompleteResult::Hints(_))
    }

    /// Apply an insertion to `line` at char offset `cursor`.
    ///
    /// Returns the new line and cursor; hints and misses leave both as is.
    pub fn apply(&self, line: &str, cursor: usize) -> (String, usize) {
        match &self.result {
            AutocompleteResult::Insert(text) => {
                let at = byte_offset(line, cursor);
                let mut out = String::with_capacity(line.len() + text.len());
                out.push_str(&line[..at]);
                out.push_str(text);
                out.push_str(&line[at..]);
                (out, cursor.min(line.chars().count()) + text.chars().count())
            }
            _ => (line.to_string(), cursor),
        }
    }
}

// ============================================================================
// Token Extraction
// ============================================================================

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn byte_offset(line: &str, cursor: usize) -> usize {
    line.char_indices()
        .nth(cursor)
        .map_or(line.len(), |(i, _)| i)
}

/// Byte index where the token ending at `before`'s end starts.
///
/// Inside an open quote the token runs from that quote; otherwise it runs
/// from the last whitespace.
fn token_start(before: &str) -> usize {
    let mut open: Option<(char, usize)> = None;
    for (i, c) in before.char_indices() {
        match open {
            None if is_quote(c) => open = Some((c, i)),
            Some((quote, _)) if c == quote => open = None,
            _ => {}
        }
    }
    if let Some((_, start)) = open {
        return start;
    }
    before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

// ============================================================================
// Public API
// ============================================================================

/// Complete the token ending at char offset `cursor` in `line`.
///
/// Relative paths are resolved against `cwd`.
pub fn complete(
    tree: &CommandTree,
    fs: &dyn FileSystem,
    cwd: &Path,
    line: &str,
    cursor: usize,
) -> Completion {
    let at = byte_offset(line, cursor);
    let start = token_start(&line[..at]);
    let token = &line[start..at];
    let mode = CompletionMode::from_token(token);

    let result = match mode {
        CompletionMode::Command => complete_command(tree, &line[..start], token),
        CompletionMode::Option => {
            let context = format!("{}{}", &line[..start], &line[at..]);
            complete_option(tree, &context, token)
        }
        CompletionMode::Path => complete_path(fs, cwd, &token[1..]),
    };
    debug!(?mode, token, ?result, "completion");

    Completion {
        mode,
        token: token.to_string(),
        result,
    }
}

fn complete_command(tree: &CommandTree, preceding: &str, token: &str) -> AutocompleteResult {
    let words = parse_line(preceding).commands;
    let resolution = resolve(tree, &words);
    if !resolution.is_complete() {
        return AutocompleteResult::NoMatch;
    }

    let names: Vec<String> = tree
        .children(resolution.target())
        .map(|(_, node)| node.name.clone())
        .filter(|name| name.starts_with(token))
        .collect();

    if token.is_empty() {
        return if names.is_empty() {
            AutocompleteResult::NoMatch
        } else {
            AutocompleteResult::Hints(names)
        };
    }
    pick(names, token, " ")
}

fn complete_option(tree: &CommandTree, context: &str, token: &str) -> AutocompleteResult {
    let words = parse_line(context).commands;
    let resolution = resolve(tree, &words);
    if !resolution.is_complete() {
        return AutocompleteResult::NoMatch;
    }

    let keys: Vec<String> = resolution
        .scope
        .options
        .iter()
        .flat_map(|spec| spec.keys())
        .map(|key| format!("--{}", key))
        .filter(|key| key.starts_with(token))
        .collect();
    pick(keys, token, "")
}

// ============================================================================
// Path Completion
// ============================================================================

/// `root` is a drive (`C:\`) or a leading separator, `dirs` every complete
/// directory segment, `name` the partial last segment.
static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<root>[A-Za-z]:[\\/]|[\\/])?(?P<dirs>(?:[^\\/]*[\\/])*)(?P<name>[^\\/]*)$")
        .expect("static regex must compile")
});

/// Partial path split into the directory to search and the name prefix.
#[derive(Debug, PartialEq)]
struct ParsedPath<'a> {
    search_dir: PathBuf,
    name_part: &'a str,
}

impl<'a> ParsedPath<'a> {
    fn parse(partial: &'a str, cwd: &Path) -> Option<Self> {
        let captures = PATH_PATTERN.captures(partial)?;
        let dirs = captures.name("dirs").map_or("", |m| m.as_str());
        let name_part = captures.name("name").map_or("", |m| m.as_str());

        let search_dir = match captures.name("root") {
            Some(root) => PathBuf::from(format!("{}{}", root.as_str(), dirs)),
            None if dirs.is_empty() => cwd.to_path_buf(),
            None => cwd.join(dirs),
        };
        Some(Self {
            search_dir,
            name_part,
        })
    }
}

fn complete_path(fs: &dyn FileSystem, cwd: &Path, partial: &str) -> AutocompleteResult {
    let Some(parsed) = ParsedPath::parse(partial, cwd) else {
        return AutocompleteResult::NoMatch;
    };

    let entries = match fs.list_dir(&parsed.search_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %parsed.search_dir.display(), %err, "path completion failed");
            return AutocompleteResult::NoMatch;
        }
    };

    let names: Vec<String> = entries
        .into_iter()
        .filter(|name| name.starts_with(parsed.name_part))
        .collect();
    pick(names, parsed.name_part, "")
}

/// Insert the remainder of a single candidate, hint several.
fn pick(candidates: Vec<String>, typed: &str, separator: &str) -> AutocompleteResult {
    match candidates.as_slice() {
        [] => AutocompleteResult::NoMatch,
        [only] => AutocompleteResult::Insert(format!("{}{}", &only[typed.len()..], separator)),
        _ => AutocompleteResult::Hints(candidates),
    }
}

// ============================================================================
// Tests
// ============================================================================
