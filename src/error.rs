use std::io;
use std::path::Path;

/// The single line printed on stderr when a session ends because of an error.
pub const DIAGNOSTIC: &str = "An error has occurred\n";

/// Everything that can go wrong while handling one segment of a line.
///
/// Every variant ends the session the same way; the variants only exist so
/// callers and tests can tell failures apart.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Malformed redirection or operator usage.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Wrong number of arguments to a built-in.
    #[error("{command}: {detail}")]
    Argument { command: String, detail: String },

    /// No directory on the search path holds an executable with this name.
    #[error("command not found: {0}")]
    Resolution(String),

    /// The operating system refused a spawn, chdir or open.
    #[error("{context}: {source}")]
    System {
        context: String,
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of a [`ShellError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Argument,
    Resolution,
    System,
}

impl ShellError {
    pub fn syntax(detail: impl Into<String>) -> Self {
        ShellError::Syntax(detail.into())
    }

    pub fn argument(command: impl Into<String>, detail: impl Into<String>) -> Self {
        ShellError::Argument {
            command: command.into(),
            detail: detail.into(),
        }
    }

    pub fn system(context: impl Into<String>, source: io::Error) -> Self {
        ShellError::System {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn open_failed(path: &Path, source: io::Error) -> Self {
        Self::system(format!("can't open {}", path.display()), source)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ShellError::Syntax(_) => ErrorKind::Syntax,
            ShellError::Argument { .. } => ErrorKind::Argument,
            ShellError::Resolution(_) => ErrorKind::Resolution,
            ShellError::System { .. } => ErrorKind::System,
        }
    }
}
