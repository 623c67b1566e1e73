//! Command line parser.
//!
//! Splits a line into three ordered streams: bare command words, quoted
//! argument literals, and `--option[=value]` entries. Order is preserved
//! within each stream only.

mod lexer;

pub use lexer::{Lexer, Token};

use std::collections::HashSet;

// =============================================================================
// Parsed Line
// =============================================================================

/// An option as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOption {
    pub name: String,
    /// `None` for a bare flag.
    pub value: Option<String>,
}

/// A tokenized command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub commands: Vec<String>,
    pub arguments: Vec<String>,
    pub options: Vec<RawOption>,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.arguments.is_empty() && self.options.is_empty()
    }

    /// Distinct option keys the user supplied.
    pub fn option_names(&self) -> HashSet<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Tokenize `input` into commands, arguments and options.
pub fn parse_line(input: &str) -> ParsedLine {
    let mut parsed = ParsedLine::default();

    for token in Lexer::new(input) {
        match token {
            Token::Word(word) => parsed.commands.push(word),
            Token::Quoted(literal) => parsed.arguments.push(literal),
            Token::Option { name, value } => parsed.options.push(RawOption { name, value }),
        }
    }

    parsed
}

// =============================================================================
// Tests
// =============================================================================
