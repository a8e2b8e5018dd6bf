//! The seam between the session and whatever carries requests to the agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::remote::entry::{DirectoryEntry, EntryKind};
use crate::remote::path::RemotePath;

/// Body of a list response. `path` is the agent's authoritative spelling
/// of the listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub path: String,
    pub files: Vec<DirectoryEntry>,
}

/// Body of a read response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: String,
}

/// Body of a write request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub content: String,
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// Body of a rename request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    #[serde(rename = "newName")]
    pub new_name: String,
}

/// One network exchange per method.
///
/// Implementations must report every failure as an error value: network
/// problems and unreadable bodies as [`crate::CoreError::Transport`],
/// non-success statuses as [`crate::CoreError::Rejected`].
#[async_trait]
pub trait FileTransport: Send + Sync {
    /// Fetches the children of `path`.
    async fn list(&self, path: &RemotePath) -> CoreResult<ListResponse>;
    /// Fetches the full content of the file at `path`.
    async fn read(&self, path: &RemotePath) -> CoreResult<String>;
    /// Overwrites the file at `path`.
    async fn write(&self, path: &RemotePath, content: &str) -> CoreResult<()>;
    /// Creates an empty file or folder at `path`.
    async fn create(&self, path: &RemotePath, kind: EntryKind) -> CoreResult<()>;
    /// Removes the entry at `path`. Directories go with their contents.
    async fn delete(&self, path: &RemotePath) -> CoreResult<()>;
    /// Renames the leaf of `path` to `new_name` inside the same parent.
    async fn rename(&self, path: &RemotePath, new_name: &str) -> CoreResult<()>;
}
