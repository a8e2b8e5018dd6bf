//! Normalized root-relative paths on the remote store.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// The string form of the root directory, as understood by the agent.
pub const ROOT_SENTINEL: &str = ".";

/// A normalized, slash-delimited, root-relative path.
///
/// A `RemotePath` never starts or ends with `/`, never has empty, `.` or
/// `..` segments, and represents the root as [`ROOT_SENTINEL`] rather than
/// an empty string. Values are immutable; navigation produces new paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath {
    // Empty string means root.
    inner: String,
}

impl RemotePath {
    /// Returns the root path.
    pub fn root() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Parses and normalizes a path string from a user or from the agent.
    ///
    /// Leading, trailing and repeated slashes are collapsed. `""` and `"."`
    /// are the root.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] if any segment is `.`/`..` or contains NUL.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        Self::from_segments(raw.split('/'))
    }

    /// Builds a path from individual segments, e.g. the parts of an editor
    /// route. A segment holding `/` is split further, empty segments are
    /// skipped, and a lone `"."` is the root.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] on traversal segments or NUL bytes.
    pub fn from_segments<I, S>(segments: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = Vec::new();
        let mut parts: Vec<String> = Vec::new();
        for segment in segments {
            let segment = segment.as_ref();
            seen.push(segment.to_string());
            for part in segment.split('/').filter(|p| !p.is_empty()) {
                if part == ".." || part.contains('\0') {
                    return Err(CoreError::InvalidPath(seen.join("/")));
                }
                parts.push(part.to_string());
            }
        }

        // "." alone is the sentinel; "." anywhere else is a traversal segment.
        if parts.len() == 1 && parts[0] == ROOT_SENTINEL {
            return Ok(Self::root());
        }
        if parts.iter().any(|p| p == ".") {
            return Err(CoreError::InvalidPath(seen.join("/")));
        }

        Ok(Self {
            inner: parts.join("/"),
        })
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the wire form: [`ROOT_SENTINEL`] for the root, otherwise
    /// the joined segments.
    pub fn as_str(&self) -> &str {
        if self.is_root() {
            ROOT_SENTINEL
        } else {
            &self.inner
        }
    }

    /// Returns the last segment, or `None` for the root.
    pub fn leaf(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        Some(match self.inner.rfind('/') {
            Some(idx) => &self.inner[idx + 1..],
            None => &self.inner,
        })
    }

    /// Returns the parent path. The parent of the root is the root.
    pub fn parent(&self) -> Self {
        match self.inner.rfind('/') {
            Some(idx) => Self {
                inner: self.inner[..idx].to_string(),
            },
            None => Self::root(),
        }
    }

    /// Appends one already-validated segment.
    pub(crate) fn join_unchecked(&self, name: &str) -> Self {
        if self.is_root() {
            Self {
                inner: name.to_string(),
            }
        } else {
            Self {
                inner: format!("{}/{}", self.inner, name),
            }
        }
    }
}

impl Default for RemotePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RemotePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
