//! Directory entry representation.

use serde::{Deserialize, Serialize};

/// A single child of a listed remote directory.
///
/// `DirectoryEntry` is an immutable snapshot taken from one list response.
/// The entries of a directory are always replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    name: String,
    #[serde(rename = "isDirectory")]
    is_directory: bool,
}

impl DirectoryEntry {
    /// Creates an entry with the given leaf name.
    pub fn new(name: impl Into<String>, is_directory: bool) -> Self {
        Self {
            name: name.into(),
            is_directory,
        }
    }

    /// Shorthand for a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Shorthand for a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Returns the leaf name of this entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }
}

/// What a create request should make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    /// Lowercase label used on the wire and in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
