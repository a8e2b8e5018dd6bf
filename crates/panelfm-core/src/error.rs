//! Error types for `panelfm-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`. Every variant belongs to
//! one [`FailureKind`], so a frontend can tell a local refusal apart from
//! a failure that involved the remote agent.

use std::path::PathBuf;

use crate::event::Operation;

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A configuration file does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to read a configuration file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file or a configured value.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An entry name is invalid (empty, `.`/`..`, contains `/` or NUL).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A path string contains a traversal segment or a NUL byte.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A directory was handed to an operation that needs a file.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// A file was handed to an operation that needs a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The named entry is not part of the current listing.
    #[error("no such entry: {0}")]
    UnknownEntry(String),

    /// Saving was requested while no file is open in the editor.
    #[error("no file is open")]
    NoOpenFile,

    /// Another mutating operation is still in flight on this session.
    #[error("another operation is in progress")]
    Busy,

    /// The agent could not be reached or answered with something unreadable.
    #[error("transport error: {0}")]
    Transport(String),

    /// The agent answered with a non-success status.
    #[error(
        "remote rejected request ({status}){}",
        message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Broad classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network unreachable, timeout, malformed response.
    Transport,
    /// The agent refused the request.
    RemoteRejection,
    /// Caught before any request was sent.
    LocalValidation,
    /// Loading local configuration failed.
    Config,
}

impl CoreError {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Rejected { .. } => FailureKind::RemoteRejection,
            Self::InvalidName(_)
            | Self::InvalidPath(_)
            | Self::NotAFile(_)
            | Self::NotADirectory(_)
            | Self::UnknownEntry(_)
            | Self::NoOpenFile
            | Self::Busy => FailureKind::LocalValidation,
            Self::NotFound(_) | Self::PermissionDenied(_) | Self::ConfigParse(_) | Self::Io(_) => {
                FailureKind::Config
            }
        }
    }

    /// Returns `true` if the agent was never contacted.
    pub fn is_local(&self) -> bool {
        !matches!(
            self.kind(),
            FailureKind::Transport | FailureKind::RemoteRejection
        )
    }

    /// Message suitable for showing to the user after `op` failed.
    ///
    /// Rejections carry the agent's own message when it sent one; transport
    /// failures collapse to the generic text for the operation.
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Rejected { .. } | Self::Transport(_) => op.failure_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Convenience alias used throughout `panelfm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
