//! Pure path arithmetic for moving around the remote tree.
//!
//! Nothing here performs I/O. Every user-supplied name passes through
//! [`validate_name`] before it can become part of a [`RemotePath`], so a
//! path reaching the transport never contains a separator smuggled in
//! through a name or a traversal segment.

use crate::error::{CoreError, CoreResult};
use crate::remote::entry::DirectoryEntry;
use crate::remote::path::RemotePath;

/// Checks that `name` is usable as a single path segment.
///
/// # Errors
///
/// [`CoreError::InvalidName`] if the name is empty, `.` or `..`, or
/// contains `/` or a NUL byte.
pub fn validate_name(name: &str) -> CoreResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(CoreError::InvalidName(name.to_string()));
    }
    if name.contains('/') || name.contains('\0') {
        return Err(CoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Returns the path of the child `entry_name` inside `current`.
///
/// At the root the result is just `entry_name`; it never starts with `/`.
///
/// # Errors
///
/// [`CoreError::InvalidName`] if `entry_name` fails [`validate_name`].
pub fn descend(current: &RemotePath, entry_name: &str) -> CoreResult<RemotePath> {
    validate_name(entry_name)?;
    Ok(current.join_unchecked(entry_name))
}

/// Returns the parent of `current`. Saturates at the root.
pub fn ascend(current: &RemotePath) -> RemotePath {
    current.parent()
}

/// Returns the path a click on `entry` inside `current` refers to.
///
/// # Errors
///
/// [`CoreError::InvalidName`] if the entry name is not a valid segment.
pub fn resolve_action_target(
    current: &RemotePath,
    entry: &DirectoryEntry,
) -> CoreResult<RemotePath> {
    descend(current, entry.name())
}
