// Error types surfaced through anyhow; callers can downcast to these.

use std::fmt;

/// A context that could not be parsed or resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextError {
    pub message: String,
}

impl ContextError {
    pub fn new(message: impl Into<String>) -> Self {
        ContextError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ContextError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Get,
    Set,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Access::Get => write!(f, "getting"),
            Access::Set => write!(f, "setting"),
        }
    }
}

/// A shortcut property name that the context disables or cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutError {
    pub key: String,
    pub access: Access,
}

impl fmt::Display for ShortcutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Illegal property {} for disabled context key '{}'",
            self.access, self.key
        )
    }
}

impl std::error::Error for ShortcutError {}
