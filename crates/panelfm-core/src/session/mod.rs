//! Remote file operations for one user session.
//!
//! A [`Session`] maps each user intent to exactly one remote call and at
//! most one state transition. Navigation state and the editor buffer live
//! in separate [`slot::Slot`]s, so a late directory listing can never
//! touch the editor and vice versa. Nothing is updated before the remote
//! call resolves, and mutations never patch the listing locally: the
//! caller re-lists the directory afterwards (see [`Session::dispatch`]).

pub mod slot;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::settings::RemoteConfig;
use crate::editor::buffer::EditorBuffer;
use crate::error::{CoreError, CoreResult};
use crate::event::{Command, Event, Operation, SAVE_SUCCESS_MESSAGE};
use crate::nav::navigator::{ascend, descend, resolve_action_target, validate_name};
use crate::nav::state::NavigationState;
use crate::remote::entry::{DirectoryEntry, EntryKind};
use crate::remote::http::HttpTransport;
use crate::remote::path::RemotePath;
use crate::remote::transport::FileTransport;

use self::slot::{Landed, Slot};

/// Whether a name-taking operation actually went to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Empty or unchanged input; nothing was sent.
    Skipped,
}

/// Holds the mutation flag for as long as a mutating call is in flight.
struct MutationGuard<'a>(&'a AtomicBool);

impl<'a> MutationGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> CoreResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CoreError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The file-operations client for one user session.
pub struct Session {
    transport: Arc<dyn FileTransport>,
    navigation: Slot<NavigationState>,
    editor: Slot<Option<EditorBuffer>>,
    mutating: AtomicBool,
}

impl Session {
    /// Creates a session at the root with an empty listing.
    pub fn new(transport: Arc<dyn FileTransport>) -> Self {
        Self {
            transport,
            navigation: Slot::new(NavigationState::default()),
            editor: Slot::new(None),
            mutating: AtomicBool::new(false),
        }
    }

    /// Creates a session talking HTTP to the configured agent.
    ///
    /// # Errors
    ///
    /// See [`HttpTransport::new`].
    pub fn connect(config: &RemoteConfig) -> CoreResult<Self> {
        let transport = HttpTransport::new(config)?;
        tracing::info!(base_url = transport.base_url(), "session created");
        Ok(Self::new(Arc::new(transport)))
    }

    /// Returns a snapshot of the navigation state.
    pub fn navigation(&self) -> NavigationState {
        self.navigation.snapshot()
    }

    /// Returns a snapshot of the open file, if any.
    pub fn editor(&self) -> Option<EditorBuffer> {
        self.editor.snapshot()
    }

    /// Returns `true` while a mutating call is in flight.
    pub fn is_busy(&self) -> bool {
        self.mutating.load(Ordering::Acquire)
    }

    // --- remote operations -------------------------------------------------

    /// Lists `path` and, on success, replaces the navigation state with the
    /// agent's authoritative path and entries.
    ///
    /// # Errors
    ///
    /// Transport and rejection errors; the navigation state is unchanged.
    pub async fn list(&self, path: &RemotePath) -> CoreResult<Landed<NavigationState>> {
        let ticket = self.navigation.issue();
        let response = self
            .transport
            .list(path)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, error = %e, "list failed"))?;

        let current = RemotePath::parse(&response.path).map_err(|_| {
            CoreError::Transport(format!(
                "malformed response: invalid path {:?}",
                response.path
            ))
        })?;

        let landed = self
            .navigation
            .apply(ticket, |state| state.with_listing(current, response.files));
        if !landed.is_applied() {
            tracing::debug!(path = %path, "dropping superseded listing");
        }
        Ok(landed)
    }

    /// Loads the file at `path` into a fresh, clean editor buffer.
    ///
    /// # Errors
    ///
    /// Transport and rejection errors; no buffer is created.
    pub async fn read(&self, path: &RemotePath) -> CoreResult<Landed<EditorBuffer>> {
        let ticket = self.editor.issue();
        let content = self
            .transport
            .read(path)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, error = %e, "read failed"))?;

        let buffer = EditorBuffer::loaded(path.clone(), content);
        let landed = self.editor.apply(ticket, |_| Some(buffer.clone()));
        Ok(match landed {
            Landed::Applied(_) => Landed::Applied(buffer),
            Landed::Superseded => {
                tracing::debug!(path = %path, "dropping superseded file content");
                Landed::Superseded
            }
        })
    }

    /// Overwrites the file at `path`. Last write wins.
    ///
    /// On success an open buffer for the same path is marked clean if it
    /// still holds `content`.
    ///
    /// # Errors
    ///
    /// [`CoreError::Busy`], transport and rejection errors. The buffer is
    /// left exactly as it was.
    pub async fn write(&self, path: &RemotePath, content: &str) -> CoreResult<()> {
        let _guard = MutationGuard::acquire(&self.mutating)?;
        self.transport
            .write(path, content)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, error = %e, "write failed"))?;

        // Only clears `dirty`, and only while the content still matches.
        self.editor.update(|slot| {
            if let Some(buffer) = slot.take() {
                *slot = Some(if buffer.path() == path {
                    buffer.mark_saved(content)
                } else {
                    buffer
                });
            }
        });
        Ok(())
    }

    /// Creates an empty file or folder at `path`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] for the root, [`CoreError::Busy`],
    /// transport and rejection errors.
    pub async fn create(&self, path: &RemotePath, kind: EntryKind) -> CoreResult<()> {
        if path.is_root() {
            return Err(CoreError::InvalidPath(path.to_string()));
        }
        let _guard = MutationGuard::acquire(&self.mutating)?;
        self.transport
            .create(path, kind)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, %kind, error = %e, "create failed"))
    }

    /// Deletes the entry at `path`. A directory is removed with everything
    /// in it.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] for the root, [`CoreError::Busy`],
    /// transport and rejection errors.
    pub async fn delete(&self, path: &RemotePath) -> CoreResult<()> {
        if path.is_root() {
            return Err(CoreError::InvalidPath(path.to_string()));
        }
        let _guard = MutationGuard::acquire(&self.mutating)?;
        self.transport
            .delete(path)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, error = %e, "delete failed"))
    }

    /// Renames the leaf of `path` to `new_name`.
    ///
    /// An empty `new_name`, or one equal to the current leaf, is a no-op.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidName`], [`CoreError::InvalidPath`] for the root,
    /// [`CoreError::Busy`], transport and rejection errors.
    pub async fn rename(&self, path: &RemotePath, new_name: &str) -> CoreResult<Outcome> {
        let Some(old_name) = path.leaf() else {
            return Err(CoreError::InvalidPath(path.to_string()));
        };
        if new_name.is_empty() || new_name == old_name {
            return Ok(Outcome::Skipped);
        }
        validate_name(new_name)?;

        let _guard = MutationGuard::acquire(&self.mutating)?;
        self.transport
            .rename(path, new_name)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, new_name, error = %e, "rename failed"))?;
        Ok(Outcome::Done)
    }

    // --- helpers relative to the current directory ---------------------------

    fn entry(&self, name: &str) -> CoreResult<(RemotePath, DirectoryEntry)> {
        let state = self.navigation();
        let entry = state
            .find(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownEntry(name.to_string()))?;
        let path = resolve_action_target(state.current_path(), &entry)?;
        Ok((path, entry))
    }

    /// Re-lists the current directory.
    pub async fn refresh(&self) -> CoreResult<Landed<NavigationState>> {
        let current = self.navigation().current_path().clone();
        self.list(&current).await
    }

    /// Lists the named child directory of the current directory.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotADirectory`] for a file entry, plus the errors of
    /// [`Session::list`]. On failure the current path does not change.
    pub async fn enter(&self, name: &str) -> CoreResult<Landed<NavigationState>> {
        let (path, entry) = self.entry(name)?;
        if !entry.is_directory() {
            return Err(CoreError::NotADirectory(path.to_string()));
        }
        self.list(&path).await
    }

    /// Lists the parent of the current directory. At the root this re-lists
    /// the root.
    pub async fn go_up(&self) -> CoreResult<Landed<NavigationState>> {
        let parent = ascend(self.navigation().current_path());
        self.list(&parent).await
    }

    /// Loads the named file of the current directory into the editor.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotAFile`] for a directory entry, plus the errors of
    /// [`Session::read`].
    pub async fn open_entry(&self, name: &str) -> CoreResult<Landed<EditorBuffer>> {
        let (path, entry) = self.entry(name)?;
        if entry.is_directory() {
            return Err(CoreError::NotAFile(path.to_string()));
        }
        self.read(&path).await
    }

    /// Creates `name` inside the current directory. An empty name is a no-op.
    pub async fn create_in_current(&self, name: &str, kind: EntryKind) -> CoreResult<Outcome> {
        let dir = self.navigation().current_path().clone();
        self.create_in(&dir, name, kind).await
    }

    /// Deletes `name` inside the current directory.
    pub async fn delete_in_current(&self, name: &str) -> CoreResult<()> {
        let dir = self.navigation().current_path().clone();
        self.delete_in(&dir, name).await
    }

    /// Renames `old_name` inside the current directory.
    pub async fn rename_in_current(&self, old_name: &str, new_name: &str) -> CoreResult<Outcome> {
        let dir = self.navigation().current_path().clone();
        self.rename_in(&dir, old_name, new_name).await
    }

    async fn create_in(
        &self,
        dir: &RemotePath,
        name: &str,
        kind: EntryKind,
    ) -> CoreResult<Outcome> {
        if name.is_empty() {
            return Ok(Outcome::Skipped);
        }
        let path = descend(dir, name)?;
        self.create(&path, kind).await?;
        Ok(Outcome::Done)
    }

    async fn delete_in(&self, dir: &RemotePath, name: &str) -> CoreResult<()> {
        let path = descend(dir, name)?;
        self.delete(&path).await
    }

    async fn rename_in(
        &self,
        dir: &RemotePath,
        old_name: &str,
        new_name: &str,
    ) -> CoreResult<Outcome> {
        if new_name.is_empty() || new_name == old_name {
            return Ok(Outcome::Skipped);
        }
        let path = descend(dir, old_name)?;
        self.rename(&path, new_name).await
    }

    /// Replaces the content of the open file locally.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoOpenFile`] if nothing is open.
    pub fn edit_buffer(&self, content: String) -> CoreResult<EditorBuffer> {
        self.editor.update(|slot| {
            let buffer = slot.take().ok_or(CoreError::NoOpenFile)?;
            let edited = buffer.edit(content);
            *slot = Some(edited.clone());
            Ok(edited)
        })
    }

    /// Writes the open file back to the agent.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoOpenFile`] plus the errors of [`Session::write`].
    pub async fn save(&self) -> CoreResult<RemotePath> {
        let buffer = self.editor().ok_or(CoreError::NoOpenFile)?;
        self.write(buffer.path(), buffer.content()).await?;
        Ok(buffer.path().clone())
    }

    // --- command dispatch ----------------------------------------------------

    /// Runs one UI command through the whole flow and reports the result.
    ///
    /// Successful mutations are followed by a re-list of the directory the
    /// entry lives in; a failing re-list is reported as a list failure.
    pub async fn dispatch(&self, command: Command) -> Event {
        match command {
            Command::Open(name) => match self.navigation().find(&name).cloned() {
                Some(entry) if entry.is_directory() => self.listed(self.enter(&name).await),
                Some(_) => self.loaded(self.open_entry(&name).await),
                None => failed(Operation::List, CoreError::UnknownEntry(name)),
            },
            Command::GoUp => self.listed(self.go_up().await),
            Command::Navigate(raw) => match RemotePath::parse(&raw) {
                Ok(path) => self.listed(self.list(&path).await),
                Err(e) => failed(Operation::List, e),
            },
            Command::Refresh => self.listed(self.refresh().await),
            Command::Edit(content) => match self.edit_buffer(content) {
                Ok(buffer) => Event::BufferEdited(buffer),
                Err(e) => failed(Operation::Write, e),
            },
            Command::Save => match self.save().await {
                Ok(path) => Event::FileSaved {
                    path,
                    message: SAVE_SUCCESS_MESSAGE,
                },
                Err(e) => failed(Operation::Write, e),
            },
            Command::Create(name, kind) => {
                let dir = self.navigation().current_path().clone();
                let result = self.create_in(&dir, &name, kind).await;
                self.mutated(Operation::Create(kind), &dir, result).await
            }
            Command::Delete(name) => {
                let dir = self.navigation().current_path().clone();
                let result = self.delete_in(&dir, &name).await.map(|()| Outcome::Done);
                self.mutated(Operation::Delete, &dir, result).await
            }
            Command::Rename(old_name, new_name) => {
                let dir = self.navigation().current_path().clone();
                let result = self.rename_in(&dir, &old_name, &new_name).await;
                self.mutated(Operation::Rename, &dir, result).await
            }
        }
    }

    fn listed(&self, result: CoreResult<Landed<NavigationState>>) -> Event {
        match result {
            Ok(Landed::Applied(state)) => Event::DirectoryLoaded(state),
            Ok(Landed::Superseded) => Event::Superseded {
                operation: Operation::List,
            },
            Err(e) => failed(Operation::List, e),
        }
    }

    fn loaded(&self, result: CoreResult<Landed<EditorBuffer>>) -> Event {
        match result {
            Ok(Landed::Applied(buffer)) => Event::FileLoaded(buffer),
            Ok(Landed::Superseded) => Event::Superseded {
                operation: Operation::Read,
            },
            Err(e) => failed(Operation::Read, e),
        }
    }

    /// Re-lists `parent`, the directory the mutated entry lives in.
    async fn mutated(
        &self,
        operation: Operation,
        parent: &RemotePath,
        result: CoreResult<Outcome>,
    ) -> Event {
        match result {
            Ok(Outcome::Skipped) => Event::Skipped { operation },
            Ok(Outcome::Done) => match self.list(parent).await {
                Ok(_) => Event::OperationComplete {
                    operation,
                    state: self.navigation(),
                },
                Err(e) => failed(Operation::List, e),
            },
            Err(e) => failed(operation, e),
        }
    }
}

fn failed(operation: Operation, error: CoreError) -> Event {
    Event::OperationFailed {
        operation,
        kind: error.kind(),
        error: error.user_message(operation),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::FailureKind;
    use crate::remote::fake::{FakeTransport, Fault};

    fn path(s: &str) -> RemotePath {
        RemotePath::parse(s).unwrap()
    }

    fn fixture() -> Arc<FakeTransport> {
        Arc::new(
            FakeTransport::new()
                .with_dir("docs")
                .with_file("docs/a.md", "# A")
                .with_file("readme.txt", "hello"),
        )
    }

    async fn listed_session(fake: &Arc<FakeTransport>) -> Session {
        let session = Session::new(fake.clone());
        session.list(&RemotePath::root()).await.unwrap();
        session
    }

    #[tokio::test]
    async fn new_session_starts_at_root() {
        let session = Session::new(fixture());
        assert!(session.navigation().current_path().is_root());
        assert!(session.navigation().entries().is_empty());
        assert!(session.editor().is_none());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn root_then_docs_scenario() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        let root = path(".");
        let state = session.list(&root).await.unwrap().applied().unwrap();
        assert_eq!(
            state.entries(),
            &[
                DirectoryEntry::directory("docs"),
                DirectoryEntry::file("readme.txt"),
            ]
        );

        let docs = descend(&root, "docs").unwrap();
        assert_eq!(docs.as_str(), "docs");

        let state = session.list(&docs).await.unwrap().applied().unwrap();
        assert_eq!(state.current_path().as_str(), "docs");
        assert_eq!(state.entries(), &[DirectoryEntry::file("a.md")]);
        assert_eq!(ascend(&docs).as_str(), ".");
    }

    #[tokio::test]
    async fn failed_list_leaves_state_intact() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        let before = session.navigation();

        fake.set_fault(Some(Fault::Transport));
        let err = session.list(&path("docs")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
        assert_eq!(session.navigation(), before);

        fake.set_fault(None);
        let err = session.list(&path("missing")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::RemoteRejection);
        assert_eq!(session.navigation(), before);
    }

    #[tokio::test]
    async fn entering_a_failing_directory_keeps_current_path() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        fake.set_fault(Some(Fault::Reject(403, Some("Permission denied".into()))));
        assert!(session.enter("docs").await.is_err());
        assert!(session.navigation().current_path().is_root());
        assert_eq!(session.navigation().entries().len(), 2);
    }

    #[tokio::test]
    async fn enter_and_go_up() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        session.enter("docs").await.unwrap();
        assert_eq!(session.navigation().current_path().as_str(), "docs");
        assert!(session.navigation().can_ascend());

        session.go_up().await.unwrap();
        assert!(session.navigation().current_path().is_root());

        // Saturates: going up at the root re-lists the root.
        session.go_up().await.unwrap();
        assert!(session.navigation().current_path().is_root());
        assert_eq!(fake.calls().last().unwrap(), "list .");
    }

    #[tokio::test]
    async fn dispatch_relists_parent_even_after_navigating_away() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        let gate = fake.gate("x");
        let docs = path("docs");

        let (event, ()) = tokio::join!(
            session.dispatch(Command::Create("x".into(), EntryKind::File)),
            async {
                session.list(&docs).await.unwrap();
                gate.notify_one();
            }
        );

        match event {
            Event::OperationComplete { state, .. } => {
                assert!(state.current_path().is_root());
                assert!(state.find("x").is_some());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(fake.calls(), ["list .", "create x", "list docs", "list ."]);
    }

    #[tokio::test]
    async fn enter_rejects_files_locally() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        let calls = fake.calls().len();

        let err = session.enter("readme.txt").await.unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
        assert_eq!(fake.calls().len(), calls);
    }

    #[tokio::test]
    async fn create_then_list_shows_new_file() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        let outcome = session
            .create_in_current("x", EntryKind::File)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Done);

        // No optimistic update: the listing only changes after a re-list.
        assert!(session.navigation().find("x").is_none());

        session.list(&RemotePath::root()).await.unwrap();
        let entry = session.navigation().find("x").cloned().unwrap();
        assert!(!entry.is_directory());
    }

    #[tokio::test]
    async fn create_with_empty_name_is_a_silent_no_op() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        let outcome = session
            .create_in_current("", EntryKind::Folder)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_traversal_names() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        let err = session
            .create_in_current("../escape", EntryKind::File)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidName(_)));
        assert!(err.is_local());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_conflict_surfaces_agent_message() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        let err = session
            .create_in_current("readme.txt", EntryKind::File)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::RemoteRejection);
        assert_eq!(
            err.user_message(Operation::Create(EntryKind::File)),
            "Already exists: readme.txt"
        );
    }

    #[tokio::test]
    async fn rename_with_unchanged_or_empty_name_sends_nothing() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        assert_eq!(
            session.rename_in_current("readme.txt", "readme.txt").await.unwrap(),
            Outcome::Skipped
        );
        assert_eq!(
            session.rename_in_current("readme.txt", "").await.unwrap(),
            Outcome::Skipped
        );
        assert_eq!(
            session.rename(&path("readme.txt"), "readme.txt").await.unwrap(),
            Outcome::Skipped
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn rename_rejects_separator_in_new_name() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        let err = session
            .rename_in_current("readme.txt", "docs/readme.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidName(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn rename_moves_entry_within_parent() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        session.enter("docs").await.unwrap();

        let outcome = session.rename_in_current("a.md", "b.md").await.unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert!(fake.exists("docs/b.md"));
        assert!(!fake.exists("docs/a.md"));
    }

    #[tokio::test]
    async fn delete_directory_removes_subtree() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        session.delete_in_current("docs").await.unwrap();
        assert!(!fake.exists("docs"));
        assert!(!fake.exists("docs/a.md"));
    }

    #[tokio::test]
    async fn root_cannot_be_created_deleted_or_renamed() {
        let fake = fixture();
        let session = Session::new(fake.clone());
        let root = RemotePath::root();

        assert!(matches!(
            session.create(&root, EntryKind::Folder).await,
            Err(CoreError::InvalidPath(_))
        ));
        assert!(matches!(
            session.delete(&root).await,
            Err(CoreError::InvalidPath(_))
        ));
        assert!(matches!(
            session.rename(&root, "x").await,
            Err(CoreError::InvalidPath(_))
        ));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn read_creates_clean_buffer() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        let buffer = session.open_entry("readme.txt").await.unwrap().applied().unwrap();
        assert_eq!(buffer.path().as_str(), "readme.txt");
        assert_eq!(buffer.content(), "hello");
        assert!(!buffer.is_dirty());
        assert_eq!(session.editor(), Some(buffer));
    }

    #[tokio::test]
    async fn failed_read_creates_no_buffer() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        fake.set_fault(Some(Fault::Transport));
        assert!(session.read(&path("readme.txt")).await.is_err());
        assert!(session.editor().is_none());
    }

    #[tokio::test]
    async fn open_entry_rejects_directories_locally() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        let calls = fake.calls().len();

        let err = session.open_entry("docs").await.unwrap_err();
        assert!(matches!(err, CoreError::NotAFile(_)));
        assert_eq!(fake.calls().len(), calls);
    }

    #[tokio::test]
    async fn save_writes_and_clears_dirty() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        session.open_entry("readme.txt").await.unwrap();

        let edited = session.edit_buffer("hello world".into()).unwrap();
        assert!(edited.is_dirty());

        let saved = session.save().await.unwrap();
        assert_eq!(saved.as_str(), "readme.txt");
        assert_eq!(fake.content("readme.txt").as_deref(), Some("hello world"));

        let buffer = session.editor().unwrap();
        assert!(!buffer.is_dirty());
        assert_eq!(buffer.content(), "hello world");
    }

    #[tokio::test]
    async fn failed_write_keeps_buffer_exactly() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        session.open_entry("readme.txt").await.unwrap();
        session.edit_buffer("unsaved edits".into()).unwrap();
        let before = session.editor().unwrap();

        fake.set_fault(Some(Fault::Reject(500, None)));
        let err = session.write(before.path(), before.content()).await.unwrap_err();
        assert_eq!(err.user_message(Operation::Write), "Failed to save file.");
        assert_eq!(session.editor(), Some(before));
        assert_eq!(fake.content("readme.txt").as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn write_is_update_only_on_this_agent() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        let err = session.write(&path("new.txt"), "x").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::RemoteRejection);
    }

    #[tokio::test]
    async fn edit_and_save_without_open_file_fail_locally() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        assert!(matches!(
            session.edit_buffer("x".into()),
            Err(CoreError::NoOpenFile)
        ));
        assert!(matches!(session.save().await, Err(CoreError::NoOpenFile)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn stale_listing_is_discarded() {
        let fake = fixture();
        let session = Session::new(fake.clone());
        let gate = fake.gate(".");
        let root = RemotePath::root();
        let docs = path("docs");

        let (slow, fast, ()) = tokio::join!(session.list(&root), session.list(&docs), async {
            gate.notify_one();
        });

        assert_eq!(slow.unwrap(), Landed::Superseded);
        assert!(fast.unwrap().is_applied());
        assert_eq!(session.navigation().current_path(), &docs);
        assert_eq!(session.navigation().entries(), &[DirectoryEntry::file("a.md")]);
    }

    #[tokio::test]
    async fn stale_read_is_discarded() {
        let fake = Arc::new(
            FakeTransport::new()
                .with_file("old.txt", "old")
                .with_file("new.txt", "new"),
        );
        let session = Session::new(fake.clone());
        let gate = fake.gate("old.txt");
        let old = path("old.txt");
        let new = path("new.txt");

        let (slow, fast, ()) = tokio::join!(
            session.read(&old),
            session.read(&new),
            async {
                gate.notify_one();
            }
        );

        assert_eq!(slow.unwrap(), Landed::Superseded);
        assert!(fast.unwrap().is_applied());
        assert_eq!(session.editor().unwrap().content(), "new");
    }

    #[tokio::test]
    async fn listing_and_editor_slots_are_independent() {
        let fake = fixture();
        let session = listed_session(&fake).await;
        session.open_entry("readme.txt").await.unwrap();

        session.enter("docs").await.unwrap();
        assert_eq!(session.editor().unwrap().path().as_str(), "readme.txt");

        fake.set_fault(Some(Fault::Transport));
        assert!(session.read(&path("docs/a.md")).await.is_err());
        assert_eq!(session.navigation().current_path().as_str(), "docs");
    }

    #[tokio::test]
    async fn second_mutation_while_busy_is_rejected() {
        let fake = fixture();
        let session = Session::new(fake.clone());
        let gate = fake.gate("new.txt");

        let (first, second, ()) = tokio::join!(
            session.create_in_current("new.txt", EntryKind::File),
            session.delete_in_current("readme.txt"),
            async {
                gate.notify_one();
            }
        );

        assert_eq!(first.unwrap(), Outcome::Done);
        assert!(matches!(second, Err(CoreError::Busy)));
        assert!(fake.exists("readme.txt"));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn busy_flag_is_released_after_failure() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        fake.set_fault(Some(Fault::Transport));
        assert!(session.delete(&path("readme.txt")).await.is_err());
        assert!(!session.is_busy());

        fake.set_fault(None);
        session.delete(&path("readme.txt")).await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_create_refreshes_listing() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        let event = session
            .dispatch(Command::Create("notes".into(), EntryKind::Folder))
            .await;
        match event {
            Event::OperationComplete { operation, state } => {
                assert_eq!(operation, Operation::Create(EntryKind::Folder));
                assert!(state.find("notes").unwrap().is_directory());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(fake.calls().last().unwrap(), "list .");
    }

    #[tokio::test]
    async fn dispatch_reports_skips_and_failures() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        let event = session
            .dispatch(Command::Rename("readme.txt".into(), "readme.txt".into()))
            .await;
        assert!(matches!(
            event,
            Event::Skipped {
                operation: Operation::Rename
            }
        ));

        fake.set_fault(Some(Fault::Reject(500, None)));
        let event = session.dispatch(Command::Delete("readme.txt".into())).await;
        match event {
            Event::OperationFailed {
                operation,
                kind,
                error,
            } => {
                assert_eq!(operation, Operation::Delete);
                assert_eq!(kind, FailureKind::RemoteRejection);
                assert_eq!(error, "Failed to delete item.");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_open_routes_by_entry_kind() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        let event = session.dispatch(Command::Open("readme.txt".into())).await;
        assert!(matches!(event, Event::FileLoaded(ref b) if b.content() == "hello"));

        let event = session.dispatch(Command::Open("docs".into())).await;
        assert!(matches!(
            event,
            Event::DirectoryLoaded(ref s) if s.current_path().as_str() == "docs"
        ));

        let event = session.dispatch(Command::Open("ghost".into())).await;
        assert!(matches!(
            event,
            Event::OperationFailed {
                kind: FailureKind::LocalValidation,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn dispatch_save_flow() {
        let fake = fixture();
        let session = listed_session(&fake).await;

        let event = session.dispatch(Command::Save).await;
        assert!(matches!(
            event,
            Event::OperationFailed {
                kind: FailureKind::LocalValidation,
                ..
            }
        ));

        session.dispatch(Command::Open("readme.txt".into())).await;
        session.dispatch(Command::Edit("bye".into())).await;
        let event = session.dispatch(Command::Save).await;
        match event {
            Event::FileSaved { path, message } => {
                assert_eq!(path.as_str(), "readme.txt");
                assert_eq!(message, "File saved successfully!");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_navigate_rejects_traversal() {
        let fake = fixture();
        let session = Session::new(fake.clone());

        let event = session.dispatch(Command::Navigate("docs/../..".into())).await;
        assert!(matches!(
            event,
            Event::OperationFailed {
                kind: FailureKind::LocalValidation,
                ..
            }
        ));
        assert!(fake.calls().is_empty());

        let event = session.dispatch(Command::Navigate("/docs/".into())).await;
        assert!(matches!(
            event,
            Event::DirectoryLoaded(ref s) if s.current_path().as_str() == "docs"
        ));
    }
}
