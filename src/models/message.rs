//! Messages returned by command handlers.

use std::fmt;

/// Severity of a [`Message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Hint,
    Warning,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Hint => "hint",
            Self::Warning => "warning",
        }
    }
}

/// Text produced by a command, tagged with a status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub status: Status,
}

impl Message {
    pub fn new(text: impl Into<String>, status: Status) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Status::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Status::Error)
    }

    pub fn hint(text: impl Into<String>) -> Self {
        Self::new(text, Status::Hint)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, Status::Warning)
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

/// Success messages print bare; the others carry a `(status)` prefix.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Success => f.write_str(&self.text),
            status => write!(f, "({}) {}", status.label(), self.text),
        }
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::success(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::success(text)
    }
}
