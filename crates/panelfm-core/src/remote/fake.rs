//! In-memory stand-in for the agent, used by unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{CoreError, CoreResult};
use crate::remote::entry::{DirectoryEntry, EntryKind};
use crate::remote::path::RemotePath;
use crate::remote::transport::{FileTransport, ListResponse};

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir,
}

/// A failure the fake should report instead of answering.
#[derive(Debug, Clone)]
pub(crate) enum Fault {
    Transport,
    Reject(u16, Option<String>),
}

impl Fault {
    fn to_error(&self) -> CoreError {
        match self {
            Self::Transport => CoreError::Transport("connection refused".into()),
            Self::Reject(status, message) => CoreError::Rejected {
                status: *status,
                message: message.clone(),
            },
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    nodes: Mutex<BTreeMap<String, Node>>,
    fault: Mutex<Option<Fault>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_dir(self, path: &str) -> Self {
        self.nodes.lock().unwrap().insert(path.to_string(), Node::Dir);
        self
    }

    pub(crate) fn with_file(self, path: &str, content: &str) -> Self {
        self.nodes
            .lock()
            .unwrap()
            .insert(path.to_string(), Node::File(content.to_string()));
        self
    }

    /// Makes every following call fail until cleared with `None`.
    pub(crate) fn set_fault(&self, fault: Option<Fault>) {
        *self.fault.lock().unwrap() = fault;
    }

    /// Holds every call on `path` until the returned handle is notified.
    pub(crate) fn gate(&self, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), notify.clone());
        notify
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn content(&self, path: &str) -> Option<String> {
        match self.nodes.lock().unwrap().get(path) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub(crate) fn exists(&self, path: &str) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    async fn enter(&self, op: &str, path: &RemotePath) -> CoreResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{op} {}", path.as_str()));
        let gate = self.gates.lock().unwrap().remove(path.as_str());
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.fault.lock().unwrap().as_ref() {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }
}

fn not_found(path: &RemotePath) -> CoreError {
    CoreError::Rejected {
        status: 404,
        message: Some(format!("Not found: {path}")),
    }
}

fn conflict(path: &RemotePath) -> CoreError {
    CoreError::Rejected {
        status: 409,
        message: Some(format!("Already exists: {path}")),
    }
}

fn is_dir(nodes: &BTreeMap<String, Node>, path: &RemotePath) -> bool {
    path.is_root() || matches!(nodes.get(path.as_str()), Some(Node::Dir))
}

fn is_within(key: &str, path: &str) -> bool {
    key == path || key.starts_with(&format!("{path}/"))
}

#[async_trait]
impl FileTransport for FakeTransport {
    async fn list(&self, path: &RemotePath) -> CoreResult<ListResponse> {
        self.enter("list", path).await?;
        let nodes = self.nodes.lock().unwrap();
        if !is_dir(&nodes, path) {
            return Err(not_found(path));
        }
        let files = nodes
            .iter()
            .filter_map(|(key, node)| {
                let child = RemotePath::parse(key).ok()?;
                (child.parent() == *path).then(|| {
                    DirectoryEntry::new(child.leaf().unwrap_or_default(), matches!(node, Node::Dir))
                })
            })
            .collect();
        Ok(ListResponse {
            path: path.as_str().to_string(),
            files,
        })
    }

    async fn read(&self, path: &RemotePath) -> CoreResult<String> {
        self.enter("read", path).await?;
        match self.nodes.lock().unwrap().get(path.as_str()) {
            Some(Node::File(content)) => Ok(content.clone()),
            _ => Err(not_found(path)),
        }
    }

    async fn write(&self, path: &RemotePath, content: &str) -> CoreResult<()> {
        self.enter("write", path).await?;
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.get_mut(path.as_str()) {
            Some(Node::File(existing)) => {
                *existing = content.to_string();
                Ok(())
            }
            _ => Err(not_found(path)),
        }
    }

    async fn create(&self, path: &RemotePath, kind: EntryKind) -> CoreResult<()> {
        self.enter("create", path).await?;
        let mut nodes = self.nodes.lock().unwrap();
        if path.is_root() || nodes.contains_key(path.as_str()) {
            return Err(conflict(path));
        }
        if !is_dir(&nodes, &path.parent()) {
            return Err(not_found(&path.parent()));
        }
        let node = match kind {
            EntryKind::File => Node::File(String::new()),
            EntryKind::Folder => Node::Dir,
        };
        nodes.insert(path.as_str().to_string(), node);
        Ok(())
    }

    async fn delete(&self, path: &RemotePath) -> CoreResult<()> {
        self.enter("delete", path).await?;
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(path.as_str()) {
            return Err(not_found(path));
        }
        nodes.retain(|key, _| !is_within(key, path.as_str()));
        Ok(())
    }

    async fn rename(&self, path: &RemotePath, new_name: &str) -> CoreResult<()> {
        self.enter("rename", path).await?;
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(path.as_str()) {
            return Err(not_found(path));
        }
        let target = path.parent().join_unchecked(new_name);
        if nodes.contains_key(target.as_str()) {
            return Err(conflict(&target));
        }
        let moved: Vec<String> = nodes
            .keys()
            .filter(|key| is_within(key, path.as_str()))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = nodes.remove(&key) {
                let suffix = &key[path.as_str().len()..];
                nodes.insert(format!("{}{suffix}", target.as_str()), node);
            }
        }
        Ok(())
    }
}
