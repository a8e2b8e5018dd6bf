//! Event system for communication between UI and Core.
//!
//! The UI translates user input into [`Command`]s, the session runs them
//! through [`crate::Session::dispatch`] and answers with an [`Event`]. Any
//! frontend can drive the same core logic this way.

use crate::editor::buffer::EditorBuffer;
use crate::error::FailureKind;
use crate::nav::state::NavigationState;
use crate::remote::entry::EntryKind;
use crate::remote::path::RemotePath;

/// Message shown after a successful save.
pub const SAVE_SUCCESS_MESSAGE: &str = "File saved successfully!";

/// The remote operation a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Write,
    Create(EntryKind),
    Delete,
    Rename,
}

impl Operation {
    /// Generic text shown when the operation failed without a more specific
    /// message from the agent.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch files. Is the agent running?",
            Self::Read => "Failed to fetch file content.",
            Self::Write => "Failed to save file.",
            Self::Create(EntryKind::File) => "Failed to create file.",
            Self::Create(EntryKind::Folder) => "Failed to create folder.",
            Self::Delete => "Failed to delete item.",
            Self::Rename => "Failed to rename item.",
        }
    }

    /// Short lowercase name for logs and status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Read => "read",
            Self::Write => "save",
            Self::Create(EntryKind::File) => "create file",
            Self::Create(EntryKind::Folder) => "create folder",
            Self::Delete => "delete",
            Self::Rename => "rename",
        }
    }
}

/// An action the UI requests the core to perform.
///
/// Commands flow **UI → Core**. Names are leaf names inside the current
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Activate the named entry: list a directory, load a file.
    Open(String),
    /// Move to the parent directory.
    GoUp,
    /// Jump to an arbitrary path.
    Navigate(String),
    /// Re-list the current directory.
    Refresh,
    /// Replace the content of the open file (local only).
    Edit(String),
    /// Write the open file back to the agent.
    Save,
    /// Create an empty file or folder.
    Create(String, EntryKind),
    /// Delete an entry (directories recursively).
    Delete(String),
    /// Rename an entry: old name, new name.
    Rename(String, String),
}

/// A notification the core sends back to the UI.
///
/// Events flow **Core → UI**. A frontend shows the latest one and clears
/// any previous error when a success arrives.
#[derive(Debug, Clone)]
pub enum Event {
    /// A directory listing has been applied.
    DirectoryLoaded(NavigationState),
    /// A file has been loaded into the editor.
    FileLoaded(EditorBuffer),
    /// The open file was changed locally.
    BufferEdited(EditorBuffer),
    /// The open file was written to the agent.
    FileSaved {
        path: RemotePath,
        message: &'static str,
    },
    /// A mutation succeeded and the directory was re-listed.
    OperationComplete {
        operation: Operation,
        state: NavigationState,
    },
    /// Nothing was sent: the input was empty or unchanged.
    Skipped { operation: Operation },
    /// The response arrived after a newer one and was dropped.
    Superseded { operation: Operation },
    /// An operation failed; nothing was applied.
    OperationFailed {
        operation: Operation,
        kind: FailureKind,
        error: String,
    },
}

impl Event {
    /// Returns `true` for [`Event::OperationFailed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::OperationFailed { .. })
    }
}
