//! In-memory copy of a remote file being edited.

use crate::remote::path::RemotePath;

/// Content of one remote file plus whether it has unsaved edits.
///
/// Immutable like the rest of the core: edits and saves return a new
/// buffer. Saving is last-write-wins; nothing here detects a concurrent
/// change on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorBuffer {
    path: RemotePath,
    content: String,
    dirty: bool,
}

impl EditorBuffer {
    /// A freshly loaded buffer. Never dirty.
    pub fn loaded(path: RemotePath, content: String) -> Self {
        Self {
            path,
            content,
            dirty: false,
        }
    }

    pub fn path(&self) -> &RemotePath {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns `true` if the content differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns a new buffer holding `content`, marked dirty if it changed.
    pub fn edit(self, content: String) -> Self {
        let dirty = self.dirty || content != self.content;
        Self {
            content,
            dirty,
            ..self
        }
    }

    /// Returns a clean buffer if `saved` is still what the buffer holds.
    ///
    /// If the user kept typing while the save was in flight the buffer
    /// stays dirty.
    pub fn mark_saved(self, saved: &str) -> Self {
        if self.content == saved {
            Self {
                dirty: false,
                ..self
            }
        } else {
            self
        }
    }
}
