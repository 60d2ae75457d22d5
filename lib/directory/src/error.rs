//! Error types for directory loading.

use std::fmt;

/// Errors raised while loading or validating a page directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The source document could not be parsed.
    Parse { reason: String },
    /// A section is neither a page (path + description) nor a group.
    IncompleteSection { section: String },
    /// A page path does not begin with `/`.
    InvalidPath { name: String, path: String },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { reason } => {
                write!(f, "failed to parse page directory: {reason}")
            }
            Self::IncompleteSection { section } => {
                write!(
                    f,
                    "section '{section}' has neither a path/description nor pages"
                )
            }
            Self::InvalidPath { name, path } => {
                write!(f, "page '{name}' has path '{path}' not beginning with '/'")
            }
        }
    }
}

impl std::error::Error for DirectoryError {}
