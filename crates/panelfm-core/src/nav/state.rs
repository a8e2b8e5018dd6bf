//! The session's view of the current remote directory.

use crate::remote::entry::DirectoryEntry;
use crate::remote::path::RemotePath;

/// Current directory plus its listed entries.
///
/// Immutable: the only transition is [`NavigationState::with_listing`],
/// which replaces path and entries together, so a state never pairs a
/// new path with a stale listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    current_path: RemotePath,
    entries: Vec<DirectoryEntry>,
}

impl NavigationState {
    /// Creates a state for `current_path` with the given entries.
    pub fn new(current_path: RemotePath, entries: Vec<DirectoryEntry>) -> Self {
        Self {
            current_path,
            entries,
        }
    }

    /// Returns the directory currently being displayed.
    pub fn current_path(&self) -> &RemotePath {
        &self.current_path
    }

    /// Returns the entries of the current directory, in listing order.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Looks up an entry of the current directory by name.
    pub fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Returns `true` when there is a parent to go up to.
    pub fn can_ascend(&self) -> bool {
        !self.current_path.is_root()
    }

    /// Returns a new state holding a fresh listing.
    pub fn with_listing(self, current_path: RemotePath, entries: Vec<DirectoryEntry>) -> Self {
        Self {
            current_path,
            entries,
        }
    }
}
