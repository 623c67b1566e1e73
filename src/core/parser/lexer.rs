//! Lexer for command lines.
//!
//! Handles:
//! - Bare words (command names), split on whitespace and quotes
//! - Quoted literals (`"a b"`, `'a b'`), quotes stripped
//! - Options: `--name`, `--name=value`, `--name="quoted value"`, or
//!   `--name value` where the following token is consumed as the value
//!
//! An unterminated quote runs to the end of the line.

// =============================================================================
// Token Types
// =============================================================================

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word outside quotes
    Word(String),
    /// Content of a quoted literal
    Quoted(String),
    /// `--name` with an optional value; `None` for a bare flag
    Option { name: String, value: Option<String> },
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for tokenizing a command line
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the entire input into a vector
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            let c = self.current_char();
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// True when the input at the cursor starts an option (`--` plus a name char).
    fn at_option(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("--") && rest[2..].chars().next().is_some_and(is_name_char)
    }

    fn next_token(&mut self) -> Option<Token> {
        let c = self.current_char();

        if is_quote(c) {
            Some(Token::Quoted(self.read_quoted(c)))
        } else if self.at_option() {
            Some(self.parse_option())
        } else {
            self.read_word().map(Token::Word)
        }
    }

    fn parse_option(&mut self) -> Token {
        self.pos += 2; // skip --
        let start = self.pos;
        while self.pos < self.input.len() {
            let c = self.current_char();
            if !is_name_char(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let name = self.input[start..self.pos].to_string();

        let value = if self.current_char() == '=' {
            self.pos += 1;
            self.read_inline_value()
        } else {
            self.read_following_value()
        };

        // `--name=` and `--name=""` both mean "no value"
        let value = value.filter(|v| !v.is_empty());
        Token::Option { name, value }
    }

    /// Value directly after `=`.
    fn read_inline_value(&mut self) -> Option<String> {
        if self.pos >= self.input.len() {
            return None;
        }
        let c = self.current_char();
        if is_quote(c) {
            return Some(self.read_quoted(c));
        }
        let start = self.pos;
        while self.pos < self.input.len() {
            let c = self.current_char();
            if c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        Some(self.input[start..self.pos].to_string())
    }

    /// Next bare or quoted token, consumed as the option's value.
    fn read_following_value(&mut self) -> Option<String> {
        let saved = self.pos;
        self.skip_whitespace();
        if self.pos >= self.input.len() || self.at_option() {
            self.pos = saved;
            return None;
        }
        let c = self.current_char();
        if is_quote(c) {
            Some(self.read_quoted(c))
        } else {
            self.read_word()
        }
    }

    fn read_quoted(&mut self, quote: char) -> String {
        self.pos += quote.len_utf8(); // skip opening quote
        let start = self.pos;

        while self.pos < self.input.len() {
            let c = self.current_char();
            if c == quote {
                let content = self.input[start..self.pos].to_string();
                self.pos += c.len_utf8();
                return content;
            }
            self.pos += c.len_utf8();
        }

        // Unclosed quote, return what we have
        self.input[start..].to_string()
    }

    fn read_word(&mut self) -> Option<String> {
        let start = self.pos;

        while self.pos < self.input.len() {
            let c = self.current_char();
            if c.is_whitespace() || is_quote(c) {
                break;
            }
            self.pos += c.len_utf8();
        }

        let word = &self.input[start..self.pos];
        if word.is_empty() {
            None
        } else {
            Some(word.to_string())
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        self.next_token()
    }
}

// =============================================================================
// Tests
// =============================================================================
